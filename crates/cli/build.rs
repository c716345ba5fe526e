use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("renderdot")
        .version(env!("CARGO_PKG_VERSION"))
        .author("renderdot contributors")
        .about("Extract the renderDot dependency graph from an HTML document")
        .arg(
            clap::arg!([INPUT] "HTML document to read, or '-' for stdin")
                .default_value("blueprint/web/dep_graph_document.html"),
        )
        .arg(
            clap::arg!(-o --output <FILE> "Output file, or '-' for stdout")
                .value_name("FILE")
                .default_value("atomization/dep_graph.json"),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format")
                .value_name("FORMAT")
                .default_value("graph")
                .value_parser(["graph", "blueprint"]),
        )
        .arg(clap::arg!(--compact "Write single-line JSON instead of pretty printing"))
        .arg(clap::arg!(-q --quiet "Suppress progress and summary output"))
        .arg(clap::arg!(--"no-analysis" "Skip the graph summary"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"))
        .arg(
            clap::arg!(--completions <SHELL> "Generate shell completion script")
                .value_name("SHELL")
                .value_parser(["bash", "elvish", "fish", "powershell", "zsh"]),
        );

    for shell in [
        clap_complete::Shell::Bash,
        clap_complete::Shell::Zsh,
        clap_complete::Shell::Fish,
        clap_complete::Shell::PowerShell,
    ] {
        clap_complete::generate_to(shell, &mut cmd, "renderdot", &completions_dir).unwrap();
    }

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
