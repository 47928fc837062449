//! Typed host commands and their textual rendering.
//!
//! Everything else in the crate builds [`HostCommand`] values. The `Display`
//! impl is the only place that knows the host's command syntax.

use std::fmt;

use takeforge_curve::{Curve, SlopeEdit};
use takeforge_events::{AnimKey, ChildEvent};

use crate::animation::Animation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveOwner {
    User,
    Analysis,
}

impl CurveOwner {
    fn as_str(self) -> &'static str {
        match self {
            CurveOwner::User => "user",
            CurveOwner::Analysis => "analysis",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectKind {
    AnimGroup,
    Anim,
    Curve,
}

impl SelectKind {
    fn as_str(self) -> &'static str {
        match self {
            SelectKind::AnimGroup => "animgroup",
            SelectKind::Anim => "anim",
            SelectKind::Curve => "curve",
        }
    }
}

/// Field changes for one existing key. `None` leaves the field alone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyEdit {
    pub time: Option<f64>,
    pub value: Option<f64>,
    pub slope_in: Option<f64>,
    pub slope_out: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum HostCommand {
    AnimGroupCreate {
        group: String,
    },
    AnimAdd {
        key: AnimKey,
    },
    CurveAdd {
        anim: AnimKey,
        name: String,
        owner: CurveOwner,
    },
    /// Inserts into the selected curve.
    KeyInsert {
        time: f64,
        value: f64,
        slope_in: f64,
        slope_out: f64,
    },
    KeyEdit {
        curve: String,
        index: usize,
        edit: KeyEdit,
    },
    EventAdd {
        anim: AnimKey,
        event: ChildEvent,
        /// Write the candidate weight; set for groups with several candidates.
        weighted: bool,
    },
    Select {
        kind: SelectKind,
        names: Vec<String>,
    },
    BatchBegin,
    /// Commit the open batch. `edited_curves` limits the refresh to curves
    /// touched by the batch.
    BatchExec {
        edited_curves: bool,
    },
    Warn {
        message: String,
    },
}

impl HostCommand {
    pub fn select(kind: SelectKind, name: impl Into<String>) -> Self {
        HostCommand::Select {
            kind,
            names: vec![name.into()],
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        HostCommand::Warn {
            message: message.into(),
        }
    }
}

/// Quote a string argument, escaping backslashes and quotes.
fn quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn flag(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostCommand::AnimGroupCreate { group } => {
                write!(f, "animGroup -create -group {};", quoted(group))
            }
            HostCommand::AnimAdd { key } => write!(
                f,
                "anim -add -group {} -name {};",
                quoted(&key.group),
                quoted(&key.name)
            ),
            HostCommand::CurveAdd { anim, name, owner } => write!(
                f,
                "curve -group {} -anim {} -add -name {} -owner {};",
                quoted(&anim.group),
                quoted(&anim.name),
                quoted(name),
                quoted(owner.as_str())
            ),
            HostCommand::KeyInsert {
                time,
                value,
                slope_in,
                slope_out,
            } => write!(
                f,
                "key -insert -time \"{time}\" -value \"{value}\" -slopeIn \"{slope_in}\" -slopeOut \"{slope_out}\";"
            ),
            HostCommand::KeyEdit { curve, index, edit } => {
                write!(f, "key -edit -curveName {} -keyIndex \"{index}\"", quoted(curve))?;
                if let Some(t) = edit.time {
                    write!(f, " -time \"{t}\"")?;
                }
                if let Some(v) = edit.value {
                    write!(f, " -value \"{v}\"")?;
                }
                if let Some(s) = edit.slope_in {
                    write!(f, " -slopeIn \"{s:.6}\"")?;
                }
                if let Some(s) = edit.slope_out {
                    write!(f, " -slopeOut \"{s:.6}\"")?;
                }
                f.write_str(";")
            }
            HostCommand::EventAdd {
                anim,
                event,
                weighted,
            } => {
                write!(
                    f,
                    "event -group {} -anim {} -add -eventgroup {} -eventanim {}",
                    quoted(&anim.group),
                    quoted(&anim.name),
                    quoted(&event.target.group),
                    quoted(&event.target.name)
                )?;
                let flags = &event.flags;
                write!(
                    f,
                    " -persist \"{}\" -inheritmag \"{}\" -inheritdur \"{}\"",
                    flag(flags.persist_values),
                    flag(flags.magnitude_scaled_by_parent),
                    flag(flags.duration_scaled_by_parent)
                )?;
                if *weighted {
                    write!(f, " -weight \"{:.6}\"", event.weight)?;
                }
                write!(f, " -probability \"{:.6}\"", event.conditions.probability())?;
                let ranges = [
                    ("start", event.start_time),
                    ("duration", event.duration),
                    ("magnitude", event.magnitude),
                    ("blendin", event.blend_in),
                    ("blendout", event.blend_out),
                ];
                for (name, r) in ranges {
                    write!(f, " -min{name} \"{:.6}\" -max{name} \"{:.6}\"", r.min, r.max)?;
                }
                write!(
                    f,
                    " -blendunscaled \"{}\" -useparentblend \"{}\"",
                    flag(flags.blend_unscaled),
                    flag(flags.use_parent_blend_times)
                )?;
                if !event.custom_payload.is_empty() {
                    write!(f, " -payload {}", quoted(&event.custom_payload))?;
                }
                f.write_str(";")
            }
            HostCommand::Select { kind, names } => {
                let joined = names.join("|");
                write!(f, "select -type {} -names {};", quoted(kind.as_str()), quoted(&joined))
            }
            HostCommand::BatchBegin => f.write_str("batch;"),
            HostCommand::BatchExec { edited_curves } => {
                if *edited_curves {
                    f.write_str("execBatch -editedcurves;")
                } else {
                    f.write_str("execBatch;")
                }
            }
            HostCommand::Warn { message } => write!(f, "warn -message {};", quoted(message)),
        }
    }
}

/// One command per line.
pub fn render_script(commands: &[HostCommand]) -> String {
    commands
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Commands that recreate `animation` on the host: the animation, each curve
/// with its keys, then every child event of its template.
pub fn build_animation_commands(animation: &Animation) -> Vec<HostCommand> {
    let key = &animation.key;
    let mut cmds = vec![
        HostCommand::AnimAdd { key: key.clone() },
        HostCommand::select(SelectKind::AnimGroup, key.group.clone()),
        HostCommand::select(SelectKind::Anim, key.name.clone()),
    ];
    for curve in &animation.curves {
        let owner = if curve.is_owned_by_analysis() {
            CurveOwner::Analysis
        } else {
            CurveOwner::User
        };
        cmds.push(HostCommand::CurveAdd {
            anim: key.clone(),
            name: curve.name().to_string(),
            owner,
        });
        cmds.push(HostCommand::select(SelectKind::Anim, key.name.clone()));
        cmds.push(HostCommand::select(SelectKind::Curve, curve.name()));
        for k in curve.keys() {
            cmds.push(HostCommand::KeyInsert {
                time: k.time,
                value: k.value,
                slope_in: k.slope_in,
                slope_out: k.slope_out,
            });
        }
    }
    if let Some(template) = &animation.template {
        for group in &template.groups {
            let weighted = group.len() > 1;
            for event in group.iter() {
                cmds.push(HostCommand::EventAdd {
                    anim: key.clone(),
                    event: event.clone(),
                    weighted,
                });
            }
        }
    }
    cmds
}

/// Mirror a slope edit list on the host inside one batch.
pub fn slope_edit_commands(curve: &Curve, edits: &[SlopeEdit]) -> Vec<HostCommand> {
    let mut cmds = Vec::with_capacity(edits.len() + 2);
    cmds.push(HostCommand::BatchBegin);
    for e in edits {
        cmds.push(HostCommand::KeyEdit {
            curve: curve.name().to_string(),
            index: e.key_index,
            edit: KeyEdit {
                slope_in: e.slope_in,
                slope_out: e.slope_out,
                ..KeyEdit::default()
            },
        });
    }
    cmds.push(HostCommand::BatchExec {
        edited_curves: true,
    });
    cmds
}

/// Rewrite every key of `before` whose fields differ in `after`. Both curves
/// must have the same key count, as produced by frame snapping.
pub fn key_sync_commands(before: &Curve, after: &Curve) -> Vec<HostCommand> {
    let mut cmds = vec![HostCommand::BatchBegin];
    for (index, (old, new)) in before.keys().iter().zip(after.keys()).enumerate() {
        if old == new {
            continue;
        }
        cmds.push(HostCommand::KeyEdit {
            curve: after.name().to_string(),
            index,
            edit: KeyEdit {
                time: Some(new.time),
                value: Some(new.value),
                slope_in: Some(new.slope_in),
                slope_out: Some(new.slope_out),
            },
        });
    }
    cmds.push(HostCommand::BatchExec {
        edited_curves: true,
    });
    cmds
}

#[cfg(test)]
mod tests {
    use super::*;
    use takeforge_curve::Keyframe;

    #[test]
    fn quoting_escapes_embedded_quotes() {
        let cmd = HostCommand::warn(r#"curve "Jaw" has one key"#);
        assert_eq!(cmd.to_string(), r#"warn -message "curve \"Jaw\" has one key";"#);
    }

    #[test]
    fn key_edit_only_writes_present_fields() {
        let cmd = HostCommand::KeyEdit {
            curve: "Head Pitch".into(),
            index: 3,
            edit: KeyEdit {
                slope_out: Some(0.5),
                ..KeyEdit::default()
            },
        };
        assert_eq!(
            cmd.to_string(),
            r#"key -edit -curveName "Head Pitch" -keyIndex "3" -slopeOut "0.500000";"#
        );
    }

    #[test]
    fn key_sync_skips_unchanged_keys() {
        let before = Curve::new(
            "c",
            vec![Keyframe::flat(0.0, 0.0), Keyframe::flat(0.51, 1.0)],
        )
        .unwrap();
        let after = before
            .with_keys(vec![Keyframe::flat(0.0, 0.0), Keyframe::flat(0.5, 1.0)])
            .unwrap();
        let cmds = key_sync_commands(&before, &after);
        assert_eq!(cmds.len(), 3);
        assert!(matches!(cmds[1], HostCommand::KeyEdit { index: 1, .. }));
    }
}
