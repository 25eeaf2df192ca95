use skylookup_core::{Backdrop, ResultView};

pub fn print_result(view: &ResultView, backdrop: Option<&Backdrop>) {
    println!();
    println!("  {}", view.label);
    if let Some(backdrop) = backdrop {
        println!("  [{}]", backdrop_text(backdrop));
    }
    println!();
    println!("  {}  {}", view.temperature, view.description);
    if let Some(icon) = &view.icon_url {
        println!("  icon: {icon}");
    }
    println!();
    println!("  Humidity    {}", view.humidity);
    println!("  Wind        {}", view.wind);
    println!("  Visibility  {}", view.visibility);
    println!("  Sunrise     {}", view.sunrise);
    println!("  Sunset      {}", view.sunset);
    println!();
    println!("  Feels Like: {}", view.feels_like);
    println!("  Pressure:   {}", view.pressure);
    println!();
}

fn backdrop_text(backdrop: &Backdrop) -> String {
    let time_of_day = if backdrop.is_day { "day" } else { "night" };
    format!("{}, {time_of_day}", backdrop.primary_condition)
}
