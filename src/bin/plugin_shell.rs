use std::{env, process};

use plugin_shell::{cli::run_cli, config::Config, init};

fn main() {
    if matches!(env::args().nth(1).as_deref(), Some("-h" | "--help")) {
        print_usage();
        return;
    }

    init();

    if let Err(err) = run_cli(Config::from_env()) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn print_usage() {
    println!(
        "Usage: plugin_shell [plugin-dir]\n\
         \n\
         The plugin directory defaults to $PLUGIN_SHELL_DIR, then ./commands.\n\
         Set PLUGIN_SHELL_SCRIPT=1 to read commands from stdin without the line editor."
    );
}
