use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("depeche")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Turn news article pages and live blogs into ordered content blocks")
        .arg(clap::arg!([INPUT] "URL to fetch, local HTML file, or '-' for stdin"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (text, json)")
                .value_name("FORMAT")
                .default_value("text")
                .value_parser(["text", "json"]),
        )
        .arg(
            clap::Arg::new("live_posts")
                .long("live-posts")
                .help("Expand a saved live post feed (JSON) instead of fetching it")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::Arg::new("no_fetch")
                .long("no-fetch")
                .help("Skip fetching live posts and comments")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(clap::arg!(--tweets "Emit embedded tweets"))
        .arg(
            clap::arg!(--theme <THEME> "Host color scheme (light, dark)")
                .value_name("THEME")
                .value_parser(["light", "dark"]),
        )
        .arg(clap::arg!(--comments "Fetch and append reader comments of standard articles"))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(
            clap::Arg::new("user_agent")
                .long("user-agent")
                .help("Custom User-Agent for HTTP requests")
                .value_name("UA"),
        )
        .arg(
            clap::arg!(--config <PATH> "Configuration file")
                .value_name("PATH")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(--completions <SHELL> "Generate shell completion script")
                .value_name("SHELL")
                .value_parser(["bash", "elvish", "fish", "powershell", "zsh"]),
        )
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "depeche", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "depeche", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "depeche", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "depeche", &completions_dir).unwrap();
}
