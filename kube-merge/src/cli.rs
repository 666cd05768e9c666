use std::path::{Path, PathBuf};

use clap::Parser;

/// Merge kubeconfig files into one, asking for a new name whenever a cluster,
/// user or context name is already taken.
#[derive(Parser, Debug)]
#[clap(name = "kube-merge", author, version, about, long_about = None)]
pub struct Cli {
    /// Config to merge in. Repeat for several; `-` reads standard input, in which
    /// case new names are asked for on the controlling terminal.
    #[clap(
        short = 's',
        long = "source",
        value_name = "PATH",
        required = true,
        multiple_occurrences = true,
        number_of_values = 1,
        parse(from_os_str)
    )]
    pub sources: Vec<PathBuf>,

    /// Config to merge into and overwrite [default: ~/.kube/config]
    #[clap(short = 'd', long = "destination", value_name = "PATH", parse(from_os_str))]
    pub destination: Option<PathBuf>,

    /// Copy the destination aside with a timestamp suffix before overwriting it
    #[clap(long)]
    pub backup: bool,

    /// Print the merged config instead of writing it
    #[clap(long)]
    pub dry_run: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[clap(short = 'v', long = "verbose", parse(from_occurrences))]
    pub verbose: u8,
}

pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::ErrorKind;

    #[test]
    fn sources_repeat_and_accept_stdin() {
        let cli = Cli::try_parse_from([
            "kube-merge",
            "-s",
            "a.yaml",
            "-s",
            "-",
            "--source",
            "b.yaml",
        ])
        .unwrap();
        assert_eq!(
            cli.sources,
            [
                PathBuf::from("a.yaml"),
                PathBuf::from("-"),
                PathBuf::from("b.yaml")
            ]
        );
        assert!(is_stdin(&cli.sources[1]));
        assert!(!is_stdin(&cli.sources[0]));
        assert_eq!(cli.destination, None);
        assert!(!cli.backup && !cli.dry_run);
    }

    #[test]
    fn destination_and_flags() {
        let cli =
            Cli::try_parse_from(["kube-merge", "-d", "/tmp/config", "-s", "x", "--backup", "-vv"])
                .unwrap();
        assert_eq!(cli.destination, Some(PathBuf::from("/tmp/config")));
        assert!(cli.backup);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn source_is_required() {
        let err = Cli::try_parse_from(["kube-merge", "-d", "/tmp/config"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }
}
