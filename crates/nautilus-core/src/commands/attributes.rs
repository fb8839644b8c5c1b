use std::io::Write;

use tracing::debug;

use crate::args::Args;
use crate::error::{ShellError, ShellResult};
use crate::mode::{ModeChange, Perm};
use crate::session::Session;
use crate::tree::NodeId;

/// Only the owner (or the superuser) may change a mode, and only on a node
/// they can reach.
fn check_chmod(session: &Session, id: NodeId) -> ShellResult<()> {
    let node = session.node(id)?;
    if !session.is_superuser() && node.owner() != session.effective_user() {
        return Err(ShellError::OperationNotPermitted);
    }
    session.require(&[session.can_reach(Perm::Execute, id)])
}

fn apply_mode(session: &mut Session, id: NodeId, change: &ModeChange) -> ShellResult<()> {
    let before = session.node(id)?.mode();
    let after = change.apply(before);
    session.tree_mut().set_mode(id, after)?;
    debug!(?id, %before, %after, "mode changed");
    Ok(())
}

/// With `-r`, descendants that fail their own checks are reported one line
/// each and skipped; the walk still visits their children.
pub(super) fn chmod(session: &mut Session, args: &Args, out: &mut dyn Write) -> ShellResult<()> {
    let recursive = args.flag("recursive");
    let mode_text = args.required("mode")?;
    let path = session.resolve(args.required("path")?);
    if !path.is_valid() {
        return Err(ShellError::InvalidSyntax);
    }
    let target = path
        .get_node(session.tree())
        .ok_or(ShellError::FileNotFound)?;
    check_chmod(session, target)?;
    let change = ModeChange::parse(mode_text)?;
    apply_mode(session, target, &change)?;

    if recursive {
        for id in session.tree().descendants(target).into_iter().skip(1) {
            match check_chmod(session, id) {
                Ok(()) => apply_mode(session, id, &change)?,
                Err(err) => {
                    debug!(?id, error = %err, "skipping node during recursive chmod");
                    writeln!(out, "chmod: {err}")?;
                }
            }
        }
    }
    Ok(())
}

/// Superuser only. With `-r` every descendant is updated without further
/// checks.
pub(super) fn chown(session: &mut Session, args: &Args, _out: &mut dyn Write) -> ShellResult<()> {
    if !session.is_superuser() {
        return Err(ShellError::OperationNotPermitted);
    }
    let user = args.required("user")?;
    if !session.has_user(user) {
        return Err(ShellError::InvalidUser);
    }
    let path = session.resolve(args.required("path")?);
    if !path.is_valid() {
        return Err(ShellError::InvalidSyntax);
    }
    let target = path
        .get_node(session.tree())
        .ok_or(ShellError::FileNotFound)?;

    let targets = if args.flag("recursive") {
        session.tree().descendants(target)
    } else {
        vec![target]
    };
    for id in targets {
        session.tree_mut().set_owner(id, user)?;
    }
    debug!(path = %path, owner = user, "owner changed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::commands::test_support::{run, setup, ALICE_TOP};
    use crate::error::ShellError;
    use crate::mode::Mode;
    use crate::session::Session;

    fn node_at<'a>(session: &'a Session, raw: &str) -> &'a crate::tree::Node {
        let id = session.resolve(raw).get_node(session.tree()).unwrap();
        session.node(id).unwrap()
    }

    #[test]
    fn test_chmod_operators() {
        let mut session = Session::default();
        setup(&mut session, &["touch f", "chmod u+x f"]);
        assert_eq!(node_at(&session, "/f").mode(), Mode::new(0b011_1100));
        setup(&mut session, &["chmod o-r f"]);
        assert_eq!(node_at(&session, "/f").mode(), Mode::new(0b011_1000));
        setup(&mut session, &["mkdir d", "chmod a=r d"]);
        assert_eq!(node_at(&session, "/d").mode(), Mode::new(0b110_0100));
    }

    #[test]
    fn test_chmod_invalid_mode_after_target_checks() {
        let mut session = Session::default();
        setup(&mut session, &["touch f"]);
        assert!(matches!(run(&mut session, "chmod u+q f"), Err(ShellError::InvalidMode)));
        assert!(matches!(run(&mut session, "chmod ux f"), Err(ShellError::InvalidMode)));
        assert!(matches!(run(&mut session, "chmod u+q ghost"), Err(ShellError::FileNotFound)));
        assert_eq!(node_at(&session, "/f").mode(), Mode::DEFAULT_FILE);
    }

    #[test]
    fn test_chmod_owner_only() {
        let mut session = Session::default();
        setup(&mut session, &["touch f", "adduser alice", "su alice"]);
        assert!(matches!(
            run(&mut session, "chmod o+w f"),
            Err(ShellError::OperationNotPermitted)
        ));
    }

    #[test]
    fn test_chmod_recursive_skips_foreign_nodes() {
        let mut session = Session::default();
        setup(
            &mut session,
            &[
                "adduser alice",
                "mkdir -p top/sub",
                "touch top/a",
                "touch top/sub/b",
                "chown -r alice top",
                "chown root top/a",
                "su alice",
            ],
        );
        let out = run(&mut session, "chmod -r o= top").unwrap();
        assert_eq!(out, "chmod: Operation not permitted\n");
        assert_eq!(node_at(&session, "/top").mode(), Mode::new(0b111_1000));
        assert_eq!(node_at(&session, "/top/a").mode(), Mode::DEFAULT_FILE);
        assert_eq!(node_at(&session, "/top/sub").mode(), Mode::new(0b111_1000));
        assert_eq!(node_at(&session, "/top/sub/b").mode(), Mode::new(0b011_0000));
    }

    #[test]
    fn test_chmod_recursive_continues_below_foreign_nodes() {
        let mut session = Session::default();
        setup(
            &mut session,
            &[
                "adduser alice",
                "mkdir -p top/mid",
                "touch top/mid/leaf",
                "chown -r alice top",
                "chown root top/mid",
                "su alice",
            ],
        );
        let out = run(&mut session, "chmod -r u-w top").unwrap();
        assert_eq!(out, "chmod: Operation not permitted\n");
        assert_eq!(node_at(&session, "/top/mid/leaf").mode(), Mode::new(0b010_0100));
    }

    #[test]
    fn test_chmod_needs_execute_on_every_ancestor() {
        let mut session = Session::default();
        setup(&mut session, ALICE_TOP);
        setup(&mut session, &["chmod u-x top"]);
        assert!(matches!(
            run(&mut session, "chmod o+w top/in/f"),
            Err(ShellError::PermissionDenied)
        ));
        assert_eq!(node_at(&session, "/top/in/f").mode(), Mode::DEFAULT_FILE);
    }

    #[test]
    fn test_chmod_recursive_reports_each_unreachable_descendant() {
        let mut session = Session::default();
        setup(&mut session, ALICE_TOP);
        let out = run(&mut session, "chmod -r u-x top").unwrap();
        assert_eq!(out, "chmod: Permission denied\n".repeat(3));
        assert_eq!(node_at(&session, "/top").mode(), Mode::new(0b111_0101));
        assert_eq!(node_at(&session, "/top/in").mode(), Mode::DEFAULT_DIRECTORY);
        assert_eq!(node_at(&session, "/top/in/d").mode(), Mode::DEFAULT_DIRECTORY);
        assert_eq!(node_at(&session, "/top/in/f").mode(), Mode::DEFAULT_FILE);
    }

    #[test]
    fn test_chmod_recursive_mixes_foreign_and_unreachable_nodes() {
        let mut session = Session::default();
        setup(
            &mut session,
            &[
                "adduser alice",
                "mkdir -p top/mid",
                "touch top/mid/leaf",
                "chown -r alice top",
                "chown root top/mid",
                "su alice",
            ],
        );
        let out = run(&mut session, "chmod -r u-x top").unwrap();
        assert_eq!(
            out,
            "chmod: Operation not permitted\nchmod: Permission denied\n"
        );
        assert_eq!(node_at(&session, "/top/mid/leaf").mode(), Mode::DEFAULT_FILE);
    }

    #[test]
    fn test_chown_requires_superuser() {
        let mut session = Session::default();
        setup(&mut session, &["touch f", "adduser alice", "su alice"]);
        for line in ["chown alice f", "chown ghost ghost", "chown -r root /"] {
            assert!(matches!(
                run(&mut session, line),
                Err(ShellError::OperationNotPermitted)
            ));
        }
    }

    #[test]
    fn test_chown_errors() {
        let mut session = Session::default();
        setup(&mut session, &["adduser alice"]);
        assert!(matches!(run(&mut session, "chown bob /"), Err(ShellError::InvalidUser)));
        assert!(matches!(run(&mut session, "chown alice ghost"), Err(ShellError::FileNotFound)));
    }

    #[test]
    fn test_chown_recursive_reaches_every_descendant() {
        let mut session = Session::default();
        setup(
            &mut session,
            &[
                "adduser alice",
                "mkdir -p a/b/c",
                "touch a/b/f",
                "touch a/g",
                "chown -r alice a",
            ],
        );
        for raw in ["/a", "/a/b", "/a/b/c", "/a/b/f", "/a/g"] {
            assert_eq!(node_at(&session, raw).owner(), "alice", "{raw}");
        }
        assert_eq!(node_at(&session, "/").owner(), "root");
    }

    #[test]
    fn test_chown_without_recursion_touches_one_node() {
        let mut session = Session::default();
        setup(&mut session, &["adduser alice", "mkdir -p a/b", "chown alice a"]);
        assert_eq!(node_at(&session, "/a").owner(), "alice");
        assert_eq!(node_at(&session, "/a/b").owner(), "root");
    }
}
