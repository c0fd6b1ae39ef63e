use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use buildbump::clock::SystemClock;
use buildbump::config;
use buildbump::plist::Plist;
use buildbump::release::ReleaseType;
use buildbump::semver;
use buildbump::ui;
use buildbump::vcs::Git;

#[derive(clap::Parser)]
#[command(
    name = "buildbump",
    about = "Bump the version/build number in a plist and tag the release"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Explicit path to the plist file")]
    plist: Option<PathBuf>,

    #[arg(short, long, default_value = ".", help = "Directory to search for the plist")]
    directory: PathBuf,

    #[arg(short, long, default_value = "beta", help = "Release type (beta or release)")]
    release_type: String,

    #[arg(
        long,
        help = "Bump the prerelease component instead of the build metadata"
    )]
    prerelease: bool,

    #[arg(long, help = "Commit the updated plist")]
    commit: bool,

    #[arg(short, long, help = "Tag the commit with the new build")]
    tag: bool,

    #[arg(short, long, help = "Override the commit message template")]
    message: Option<String>,

    #[arg(long, help = "Override the tag name prefix")]
    tag_prefix: Option<String>,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(short, long, help = "Skip confirmation prompts")]
    force: bool,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("buildbump {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let release_type: ReleaseType = match args.release_type.parse() {
        Ok(release_type) => release_type,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    // Load configuration
    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    // Bind the plist editor
    let mut plist = match Plist::new(Some(&config.plist.command_path)) {
        Ok(plist) => plist,
        Err(e) => {
            ui::display_error(&format!("Plist editor error: {}", e));
            std::process::exit(1);
        }
    };

    // Locate the plist file
    let plist_path = match &args.plist {
        Some(path) => path.clone(),
        None => {
            match plist.find(&args.directory, Some(config.plist.filename.as_str())) {
                Ok(Some(path)) => path,
                Ok(None) => {
                    ui::display_error(&format!(
                        "No {} found under {}",
                        config.plist.filename,
                        args.directory.display()
                    ));
                    std::process::exit(1);
                }
                Err(e) => {
                    ui::display_error(&format!("Plist search failed: {}", e));
                    std::process::exit(1);
                }
            }
        }
    };

    if let Err(e) = plist.set_file_path(&plist_path) {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }

    ui::display_status(&format!("Reading {}", plist_path.display()));
    if let Err(e) = plist.read() {
        ui::display_error(&format!("Failed to read plist: {}", e));
        std::process::exit(1);
    }

    let version = plist.version().unwrap_or_default().to_string();
    let old_build = plist.build().unwrap_or_default().to_string();

    // Bump
    let new_build = match plist.bump_build(args.prerelease, &SystemClock) {
        Ok(build) => build,
        Err(e) => {
            ui::display_error(&format!("Failed to bump build: {}", e));
            std::process::exit(1);
        }
    };

    ui::display_proposed_build(&old_build, &new_build);

    let tag_prefix = args
        .tag_prefix
        .clone()
        .unwrap_or_else(|| config.git.tag_prefix.clone());
    let tag_body = semver::join_version_build(&version, &new_build);
    let full_tag = format!("{}{}", tag_prefix, tag_body);

    if args.dry_run {
        ui::display_status("Dry run:");
        ui::display_success(&format!("  Step 1: would write build {} to plist", new_build));
        if args.commit {
            ui::display_success("  Step 2: would commit the updated plist");
        }
        if args.tag {
            ui::display_success(&format!("  Step 3: would create tag {}", full_tag));
        }
        return Ok(());
    }

    if !args.force && !ui::confirm_action("Write the updated build number?")? {
        println!("Operation cancelled by user.");
        return Ok(());
    }

    if let Err(e) = plist.write_safe() {
        ui::display_error(&format!("Failed to write plist: {}", e));
        std::process::exit(1);
    }
    ui::display_success(&format!("Updated {} to {}", plist_path.display(), new_build));

    if !args.commit && !args.tag {
        return Ok(());
    }

    let mut git = match Git::new(Some(args.directory.as_path()), Some(&config.git.command_path)) {
        Ok(git) => git,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            std::process::exit(1);
        }
    };
    git.set_tag_prefix(tag_prefix.as_str());

    let message = args
        .message
        .clone()
        .unwrap_or_else(|| config.git.commit_message.clone())
        .replace("{tag}", &full_tag)
        .replace("{release_type}", &release_type.to_string());

    if args.commit {
        ui::display_status("Committing updated plist");
        if let Err(e) = git.write_commit(&message) {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
        ui::display_success(&format!("Committed: {}", message));
    }

    if args.tag {
        ui::display_status(&format!("Creating tag: {}", full_tag));
        if let Err(e) = git.write_tag(&tag_body, Some(&message), None) {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
        ui::display_success(&format!("Created tag: {}", full_tag));
    }

    Ok(())
}
