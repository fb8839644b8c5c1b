use std::collections::BTreeMap;
use std::io::Write;

use crate::args::Args;
use crate::error::{ShellError, ShellResult};
use crate::mode::Perm;
use crate::session::Session;
use crate::tree::NodeId;

const CURRENT_DIR: &str = ".";

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

pub(super) fn ls(session: &mut Session, args: &Args, out: &mut dyn Write) -> ShellResult<()> {
    let all = args.flag("all");
    let raw = args.value("path").unwrap_or(CURRENT_DIR);

    let target = if raw == CURRENT_DIR {
        session.pwd()
    } else {
        let path = session.resolve(raw);
        if !path.is_valid() {
            return Err(ShellError::InvalidSyntax);
        }
        path.get_node(session.tree())
            .ok_or(ShellError::FileNotFound)?
    };
    let node = session.node(target)?;
    let parent = node.parent().unwrap_or(target);
    session.require(&[session.can_reach(Perm::Execute, target)])?;

    let mut entries: BTreeMap<String, NodeId> = BTreeMap::new();
    if node.is_dir() {
        session.require(&[session.can(Perm::Read, target)])?;
        if args.flag("directory") {
            session.require(&[session.can(Perm::Read, parent)])?;
            if all || !is_hidden(raw) {
                entries.insert(raw.to_string(), target);
            }
        } else {
            if all {
                entries.insert(".".to_string(), target);
                entries.insert("..".to_string(), parent);
            }
            entries.extend(
                node.children()
                    .filter(|(name, _)| all || !is_hidden(name))
                    .map(|(name, id)| (name.to_string(), id)),
            );
        }
    } else {
        session.require(&[session.can(Perm::Read, parent)])?;
        if all || !is_hidden(raw) {
            entries.insert(raw.to_string(), target);
        }
    }

    let long = args.flag("long");
    for (name, id) in entries {
        if long {
            let entry = session.node(id)?;
            writeln!(out, "{} {} {name}", entry.mode(), entry.owner())?;
        } else {
            writeln!(out, "{name}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::commands::test_support::{run, setup, ALICE_TOP};
    use crate::error::ShellError;
    use crate::session::Session;

    #[test]
    fn test_ls_sorts_and_hides_dot_names() {
        let mut session = Session::default();
        setup(&mut session, &["touch zeta", "mkdir alpha", "touch .hidden"]);
        assert_eq!(run(&mut session, "ls").unwrap(), "alpha\nzeta\n");
        assert_eq!(
            run(&mut session, "ls -a").unwrap(),
            ".\n..\n.hidden\nalpha\nzeta\n"
        );
    }

    #[test]
    fn test_ls_long_format() {
        let mut session = Session::default();
        setup(&mut session, &["mkdir docs", "touch docs/a.txt", "mkdir docs/sub"]);
        assert_eq!(
            run(&mut session, "ls -l docs").unwrap(),
            "-rw-r-- root a.txt\ndrwxr-x root sub\n"
        );
    }

    #[test]
    fn test_ls_directory_itself() {
        let mut session = Session::default();
        setup(&mut session, &["mkdir -p docs/sub"]);
        assert_eq!(run(&mut session, "ls -d docs").unwrap(), "docs\n");
        assert_eq!(run(&mut session, "ls -d -l docs").unwrap(), "drwxr-x root docs\n");
        assert_eq!(run(&mut session, "ls -d ./docs").unwrap(), "");
        assert_eq!(run(&mut session, "ls -d -a ./docs").unwrap(), "./docs\n");
    }

    #[test]
    fn test_ls_single_file_uses_raw_path() {
        let mut session = Session::default();
        setup(&mut session, &["mkdir d", "touch d/f"]);
        assert_eq!(run(&mut session, "ls d/f").unwrap(), "d/f\n");
        assert_eq!(run(&mut session, "ls -l /d/f").unwrap(), "-rw-r-- root /d/f\n");
    }

    #[test]
    fn test_ls_root_with_all_lists_itself_as_parent() {
        let mut session = Session::default();
        setup(&mut session, &["cd /"]);
        assert_eq!(run(&mut session, "ls -a -l").unwrap(), "drwxr-x root .\ndrwxr-x root ..\n");
    }

    #[test]
    fn test_ls_needs_execute_on_every_ancestor() {
        let mut session = Session::default();
        setup(&mut session, ALICE_TOP);
        assert_eq!(run(&mut session, "ls top/in").unwrap(), "d\nf\n");
        setup(&mut session, &["chmod u-x top"]);
        for line in ["ls top/in", "ls top/in/f", "ls -d top/in/d"] {
            assert!(
                matches!(run(&mut session, line), Err(ShellError::PermissionDenied)),
                "{line}"
            );
        }
    }

    #[test]
    fn test_ls_errors() {
        let mut session = Session::default();
        setup(&mut session, &["mkdir private", "chmod o-r private", "adduser alice", "su alice"]);
        assert!(matches!(run(&mut session, "ls ghost"), Err(ShellError::FileNotFound)));
        assert!(matches!(run(&mut session, "ls a?b"), Err(ShellError::InvalidSyntax)));
        assert!(matches!(
            run(&mut session, "ls private"),
            Err(ShellError::PermissionDenied)
        ));
        setup(&mut session, &["su", "chmod o-x private", "touch private/f", "chmod o+r private", "su alice"]);
        assert!(matches!(
            run(&mut session, "ls private/f"),
            Err(ShellError::PermissionDenied)
        ));
    }
}
