pub mod cycle_end;

/// Flatten a clap error into a single diagnostic line.
pub fn usage_line(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let detail = rendered
        .lines()
        .map(str::trim)
        .take_while(|line| !line.starts_with("Usage:"))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    detail
        .strip_prefix("error: ")
        .unwrap_or(&detail)
        .to_string()
}
