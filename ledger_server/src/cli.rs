use std::{env, env::VarError};

/// The server takes no arguments. Passing any at all prints the help text and the current configuration.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Only variables listed here are printed
    const DISPLAY_ENVS: [&str; 9] = [
        "RUST_LOG",
        "LGR_HOST",
        "LGR_PORT",
        "LGR_DATABASE_URL",
        "LGR_MAX_CONNECTIONS",
        "LGR_RUN_MIGRATIONS",
        "LGR_COMMISSION_RATE",
        "LGR_PLATFORM_USER_ID",
        "LGR_UNIT_TIMEOUT_MS",
    ];

    println!("Current environment values:");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
