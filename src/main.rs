use std::error::Error;
use std::path::{Path, PathBuf};

use argh::FromArgs;

use texture_crunch::policy::{Classifier, PolicyConfig};
use texture_crunch::store::fs::FsStore;
use texture_crunch::{processor, sniffer};

#[derive(FromArgs, Debug)]
/// Texture import preprocessing: sniff pixel metadata and apply crunch
/// compression policy over a project tree.
struct TopLevel {
    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Commands {
    Scan(ScanCmd),
    Fix(FixCmd),
    Crunch(CrunchCmd),
}

#[derive(FromArgs, Debug)]
/// Scan folders for metadata issues, then offer to fix missing alpha flags
#[argh(subcommand, name = "scan")]
struct ScanCmd {
    /// project root directory (default: current directory)
    #[argh(option, short = 'p', default = "PathBuf::from(\".\")")]
    project: PathBuf,

    /// answer yes to the fix prompt
    #[argh(switch, short = 'y')]
    yes: bool,

    /// folders to scan, relative to the project root (default: whole project)
    #[argh(positional)]
    folders: Vec<String>,
}

#[derive(FromArgs, Debug)]
/// Fix missing alpha flags directly, without a scan or prompt
#[argh(subcommand, name = "fix")]
struct FixCmd {
    /// project root directory (default: current directory)
    #[argh(option, short = 'p', default = "PathBuf::from(\".\")")]
    project: PathBuf,

    /// folders to fix, relative to the project root (default: whole project)
    #[argh(positional)]
    folders: Vec<String>,
}

#[derive(FromArgs, Debug)]
/// Apply max-size and crunch compression policy to every texture
#[argh(subcommand, name = "crunch")]
struct CrunchCmd {
    /// project root directory (default: current directory)
    #[argh(option, short = 'p', default = "PathBuf::from(\".\")")]
    project: PathBuf,

    /// policy configuration file (JSON); stock constants when omitted
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// folders to crunch, relative to the project root (default: whole project)
    #[argh(positional)]
    folders: Vec<String>,
}

fn main() {
    let top: TopLevel = argh::from_env();
    if let Err(e) = run(top) {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}

fn run(top: TopLevel) -> Result<(), Box<dyn Error>> {
    match top.command {
        Commands::Scan(cmd) => {
            let folders = normalize_folders(cmd.folders);
            check_folders(&cmd.project, &folders)?;
            let mut store = FsStore::new(&cmd.project).assume_yes(cmd.yes);

            println!("🔍 Scanning {} ...", describe_folders(&folders));
            let (scan_report, fix_report) = sniffer::sniff_and_fix(&mut store, &folders)?;

            if scan_report.is_empty() {
                println!("No textures found.");
            } else {
                println!("📊 {}", scan_report.summary());
                match fix_report {
                    Some(fixed) => println!("✅ Fixed {} texture(s).", fixed.fixed_count),
                    None => println!("No changes applied."),
                }
            }
        }
        Commands::Fix(cmd) => {
            let folders = normalize_folders(cmd.folders);
            check_folders(&cmd.project, &folders)?;
            let mut store = FsStore::new(&cmd.project);

            println!("🔍 Fixing {} ...", describe_folders(&folders));
            let report = sniffer::fix(&mut store, &folders)?;
            println!("✅ Fixed {} texture(s).", report.fixed_count);
        }
        Commands::Crunch(cmd) => {
            let folders = normalize_folders(cmd.folders);
            check_folders(&cmd.project, &folders)?;
            let classifier = Classifier::new(load_config(cmd.config.as_deref())?);
            let mut store = FsStore::new(&cmd.project);

            println!("🔍 Crunching {} ...", describe_folders(&folders));
            let report = processor::apply_crunch(&mut store, &classifier, &folders)?;

            if report.applied_count == 0 {
                println!("No textures to crunch.");
            } else {
                println!(
                    "✅ Applied crunch compression to {} texture(s).",
                    report.applied_count
                );
            }
        }
    }

    Ok(())
}

fn normalize_folders(folders: Vec<String>) -> Vec<String> {
    if folders.is_empty() {
        vec![".".to_string()]
    } else {
        folders
    }
}

fn describe_folders(folders: &[String]) -> String {
    if folders.len() == 1 && folders[0] == "." {
        "the whole project".to_string()
    } else {
        folders.join(", ")
    }
}

/// Every selected folder must exist before a batch starts.
fn check_folders(project: &Path, folders: &[String]) -> Result<(), Box<dyn Error>> {
    if !project.is_dir() {
        return Err(format!("project root is not a directory: {}", project.display()).into());
    }
    for folder in folders {
        if !project.join(folder).is_dir() {
            return Err(format!(
                "not a folder under {}: {folder}",
                project.display()
            )
            .into());
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<PolicyConfig, Box<dyn Error>> {
    match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)?;
            Ok(PolicyConfig::from_json(&text)?)
        }
        None => Ok(PolicyConfig::default()),
    }
}
