use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use m100_config::{
    keycodes::{self, CodeType},
    settings_file, version,
};
use std::{path::PathBuf, process};

/// Configure the Keyboardio Model 100 firmware
#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List keycode names
    KeycodesList(ListKeycodesArgs),
    /// Print the settings stored in an image file
    SettingsShow(SettingsShowArgs),
    /// Change settings in an image file, creating it from defaults if missing
    SettingsSet(SettingsSetArgs),
    /// Print the build version for a framework and a config tree
    Version(VersionArgs),
}

#[derive(Copy, Clone, ValueEnum)]
enum CodeTypeArg {
    Basic,
    Modifier,
    Consumer,
    System,
    Mouse,
    Firmware,
}
impl CodeTypeArg {
    fn code_type(self) -> CodeType {
        match self {
            CodeTypeArg::Basic => CodeType::Basic,
            CodeTypeArg::Modifier => CodeType::Modifier,
            CodeTypeArg::Consumer => CodeType::Consumer,
            CodeTypeArg::System => CodeType::System,
            CodeTypeArg::Mouse => CodeType::Mouse,
            CodeTypeArg::Firmware => CodeType::Firmware,
        }
    }
}

#[derive(Args)]
struct ListKeycodesArgs {
    /// Include the keycode hex value
    #[clap(long, short)]
    verbose: bool,

    /// Sort results by keycode; Defaults to sorting by name
    #[clap(long, short)]
    sort_by_keycode: bool,

    /// Limit to keycode type
    #[clap(long, short)]
    code_type: Option<CodeTypeArg>,

    /// Only list key names that contain pattern (case insensitive). If pattern starts with 0x
    /// then key names matching the key code will be shown.
    #[clap()]
    pattern: Option<String>,
}

#[derive(Args)]
struct SettingsShowArgs {
    /// settings image file
    file: PathBuf,
}

#[derive(Args)]
struct SettingsSetArgs {
    /// settings image file
    file: PathBuf,

    /// name=value assignments, e.g. qukeys_overlap=90
    #[clap(required = true)]
    assignments: Vec<String>,
}

#[derive(Args)]
struct VersionArgs {
    /// framework source tree
    framework_dir: PathBuf,

    /// config source tree; defaults to the framework tree
    config_dir: Option<PathBuf>,
}

fn list_keycodes(args: &ListKeycodesArgs) -> Result<Vec<String>> {
    let iter = keycodes::keycodes_iter().filter(|d| match args.code_type {
        Some(t) => keycodes::code_type(d.code) == Some(t.code_type()),
        None => true,
    });
    let mut codes = if let Some(pattern) = &args.pattern {
        let pattern = pattern.to_lowercase();
        if let Some(hex) = pattern.strip_prefix("0x") {
            let pattern = u16::from_str_radix(hex, 16)?;
            iter.filter(|p| p.code == pattern).collect::<Vec<_>>()
        } else {
            let pattern = pattern.as_str();
            iter.filter(|p| p.name.to_lowercase().contains(pattern))
                .collect::<Vec<_>>()
        }
    } else {
        iter.collect::<Vec<_>>()
    };
    if args.sort_by_keycode {
        codes.sort_by(|a, b| a.code.cmp(&b.code).then(a.name.cmp(b.name)));
    } else {
        codes.sort_by_key(|k| k.name);
    }
    Ok(codes
        .into_iter()
        .map(|d| {
            if args.verbose {
                format!("{:04X}: {}", d.code, d.name)
            } else {
                d.name.to_string()
            }
        })
        .collect())
}

fn settings_show(args: &SettingsShowArgs) -> Result<Vec<String>> {
    let settings = settings_file::read_file(&args.file)?;
    Ok(settings_file::describe(&settings))
}

fn settings_set(args: &SettingsSetArgs) -> Result<Vec<String>> {
    let mut settings = settings_file::read_or_default(&args.file)?;
    for assignment in &args.assignments {
        settings_file::assign(&mut settings, assignment)?;
    }
    settings_file::write_file(&args.file, &settings)?;
    Ok(settings_file::describe(&settings))
}

fn print_version(args: &VersionArgs) -> Vec<String> {
    let config = args.config_dir.as_ref().unwrap_or(&args.framework_dir);
    vec![version::build_version(&args.framework_dir, config)]
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        Err(message) => {
            eprintln!("{message:#}");
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<Vec<String>> {
    match &cli.command {
        Commands::KeycodesList(args) => list_keycodes(args),
        Commands::SettingsShow(args) => settings_show(args),
        Commands::SettingsSet(args) => settings_set(args),
        Commands::Version(args) => Ok(print_version(args)),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn list_args(pattern: Option<&str>) -> ListKeycodesArgs {
        ListKeycodesArgs {
            verbose: false,
            sort_by_keycode: false,
            code_type: None,
            pattern: pattern.map(str::to_string),
        }
    }

    #[test]
    fn keycodes_by_pattern() {
        let names = list_keycodes(&list_args(Some("wheel"))).unwrap();
        assert_eq!(
            names,
            [
                "MouseWheelDown",
                "MouseWheelLeft",
                "MouseWheelRight",
                "MouseWheelUp"
            ]
        );

        let mut args = list_args(Some("0xe1"));
        args.verbose = true;
        assert_eq!(list_keycodes(&args).unwrap(), ["00E1: LeftShift"]);

        assert!(list_keycodes(&list_args(Some("0xzz"))).is_err());
    }

    #[test]
    fn keycodes_by_type() {
        let mut args = list_args(None);
        args.code_type = Some(CodeTypeArg::Firmware);
        args.sort_by_keycode = true;
        assert_eq!(
            list_keycodes(&args).unwrap(),
            ["LedNext", "LedPrevious", "LedToggle"]
        );
    }

    #[test]
    fn settings_cmds() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("m100.settings");

        let lines = settings_set(&SettingsSetArgs {
            file: file.clone(),
            assignments: vec!["led_effect=2".into(), "qukeys_overlap=95".into()],
        })
        .unwrap();
        assert_eq!(lines[0], "qukeys_overlap = 95");

        let lines = settings_show(&SettingsShowArgs { file: file.clone() }).unwrap();
        assert_eq!(lines[3], "led_effect = 2");

        assert!(settings_set(&SettingsSetArgs {
            file: file.clone(),
            assignments: vec!["led_brightness=300".into()],
        })
        .is_err());
        let lines = settings_show(&SettingsShowArgs { file }).unwrap();
        assert_eq!(lines[2], "led_brightness = 160");
    }

    #[test]
    fn cli_parses() {
        let cli = Cli::try_parse_from(["m100-config", "settings-set", "x.bin", "led_effect=1"])
            .unwrap();
        assert!(matches!(cli.command, Commands::SettingsSet(_)));
        assert!(Cli::try_parse_from(["m100-config", "settings-set", "x.bin"]).is_err());
    }
}
