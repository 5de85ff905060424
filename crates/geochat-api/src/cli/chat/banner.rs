//! Welcome banner display for chat sessions.

use std::path::Path;

use console::style;

/// Print the banner shown before the prompt opens.
pub fn print_welcome_banner(user_name: &str, timeout_minutes: u32, data_dir: &Path) {
    println!();
    println!("  {} {}", style("GeoChat").cyan().bold(), style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim());
    println!();
    println!("  {}     {}", style("User:").bold(), style(user_name).green());
    println!(
        "  {}  {}",
        style("Timeout:").bold(),
        style(describe_timeout(timeout_minutes)).dim()
    );
    println!("  {}     {}", style("Data:").bold(), style(data_dir.display()).dim());
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to leave").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}

/// Human-readable inactivity limit.
pub fn describe_timeout(minutes: u32) -> String {
    match minutes {
        0 => "none".to_string(),
        1 => "1 minute of inactivity".to_string(),
        n => format!("{n} minutes of inactivity"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_timeout() {
        assert_eq!(describe_timeout(0), "none");
        assert_eq!(describe_timeout(1), "1 minute of inactivity");
        assert_eq!(describe_timeout(5), "5 minutes of inactivity");
    }
}
