//! Startup Banner

use colored::Colorize;

const BANNER: &str = r#"
    ____                 __  ____
   / __ \____ __      __/  |/  (_)___  ___  _____
  / /_/ / __ `/ | /| / / /|_/ / / __ \/ _ \/ ___/
 / ____/ /_/ /| |/ |/ / /  / / / / / /  __/ /
/_/    \__,_/ |__/|__/_/  /_/_/_/ /_/\___/_/
"#;

/// Print the startup banner and version line.
pub fn print_banner() {
    println!("{}", BANNER.cyan());
    println!(
        "  {} {}",
        "PawMiner".white().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("{}", "  Robot-cat mining automation".dimmed());
    println!();
}
