use std::env;
use std::path::{Path, PathBuf};

use jice_compiler::{compile, CompileOptions};

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  jicc <project_path> <build_path> [--splash-delay <secs>] [--engine-path <path>]");
}

fn parse_flag_value(args: &[String], flag: &str) -> Option<String> {
    let idx = args.iter().position(|a| a == flag)?;
    args.get(idx + 1).cloned()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }
    let (Some(project), Some(build)) = (args.get(1), args.get(2)) else {
        print_usage();
        std::process::exit(2);
    };
    if project.starts_with('-') || build.starts_with('-') {
        print_usage();
        std::process::exit(2);
    }

    let mut options = CompileOptions::default();
    if let Some(value) = parse_flag_value(&args, "--splash-delay") {
        let Ok(secs) = value.parse::<u64>() else {
            eprintln!("--splash-delay expects a whole number of seconds");
            std::process::exit(2);
        };
        options.splash_delay_secs = secs;
    }
    if let Some(value) = parse_flag_value(&args, "--engine-path") {
        options.engine_path = PathBuf::from(value);
    }

    match compile(Path::new(project), Path::new(build), &options) {
        Ok(report) => {
            println!("{report}");
            if !report.is_clean() {
                std::process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
