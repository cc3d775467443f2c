use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("retexo")
        .version("1.0.0")
        .author("Retexo Contributors")
        .about("Rewrite content store posts from extracted web articles")
        .arg(clap::arg!(--url <URL> "Target post URL").value_name("URL"))
        .arg(
            clap::arg!(--file <FILE> "Jobs file with one configuration per line")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--source_url <URL> "Source article URL (copy mode)").value_name("URL"))
        .arg(clap::arg!(--copy_mode "Copy content from the source URL into the target post"))
        .arg(clap::arg!(--start_keyword <KEYWORD> "Start copying source content from this keyword").value_name("KEYWORD"))
        .arg(clap::arg!(--dry_run "Preview the change without updating the store"))
        .arg(clap::arg!(--info "Show post info without updating anything"))
        .arg(clap::arg!(--no_interleave "Append target images at the end instead of interleaving"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "retexo", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "retexo", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "retexo", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "retexo", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
