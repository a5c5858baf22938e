//! Which startup file each shell reads, and how to extend PATH in it.

use crate::probe::{OsFamily, ShellKind};
use std::path::{Path, PathBuf};

/// Comment written above every line envboot appends.
pub const MARKER: &str = "# Added by envboot";

/// The startup file a new session of `shell` will read.
///
/// Bash on macOS starts login shells, which read `.bash_profile` rather
/// than `.bashrc`.
pub fn config_file_for(shell: ShellKind, os: OsFamily, home: &Path, documents: &Path) -> PathBuf {
    match shell {
        ShellKind::Zsh => home.join(".zshrc"),
        ShellKind::Bash if os == OsFamily::MacOs => home.join(".bash_profile"),
        ShellKind::Bash => home.join(".bashrc"),
        ShellKind::Fish => home.join(".config").join("fish").join("config.fish"),
        ShellKind::PowerShell => documents
            .join("PowerShell")
            .join("Microsoft.PowerShell_profile.ps1"),
        ShellKind::Sh | ShellKind::Unknown => home.join(".profile"),
    }
}

/// The line that prepends `dir` to PATH in `shell`'s syntax.
pub fn path_line(shell: ShellKind, dir: &Path) -> String {
    let dir = dir.display();
    match shell {
        ShellKind::Fish => format!("set -gx PATH \"{}\" $PATH", dir),
        ShellKind::PowerShell => format!("$env:Path = \"{};\" + $env:Path", dir),
        ShellKind::Zsh | ShellKind::Bash | ShellKind::Sh | ShellKind::Unknown => {
            format!("export PATH=\"{}:$PATH\"", dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::LinuxDistro;

    fn file(shell: ShellKind, os: OsFamily) -> PathBuf {
        config_file_for(shell, os, Path::new("/home/dev"), Path::new("/home/dev/Documents"))
    }

    #[test]
    fn picks_file_per_shell() {
        let linux = OsFamily::Linux(LinuxDistro::Debian);
        assert_eq!(file(ShellKind::Zsh, linux), PathBuf::from("/home/dev/.zshrc"));
        assert_eq!(file(ShellKind::Bash, linux), PathBuf::from("/home/dev/.bashrc"));
        assert_eq!(
            file(ShellKind::Bash, OsFamily::MacOs),
            PathBuf::from("/home/dev/.bash_profile")
        );
        assert_eq!(
            file(ShellKind::Fish, linux),
            PathBuf::from("/home/dev/.config/fish/config.fish")
        );
        assert_eq!(file(ShellKind::Unknown, linux), PathBuf::from("/home/dev/.profile"));
        assert!(file(ShellKind::PowerShell, OsFamily::Windows)
            .ends_with("PowerShell/Microsoft.PowerShell_profile.ps1"));
    }

    #[test]
    fn lines_use_shell_syntax() {
        let dir = Path::new("/opt/homebrew/bin");
        assert_eq!(
            path_line(ShellKind::Zsh, dir),
            "export PATH=\"/opt/homebrew/bin:$PATH\""
        );
        assert!(path_line(ShellKind::Fish, dir).starts_with("set -gx PATH"));
        assert!(path_line(ShellKind::PowerShell, dir).starts_with("$env:Path"));
    }
}
