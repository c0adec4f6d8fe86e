// pcbart_core/src/editcmd.rs
use crate::{LayerCategory, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    Layer(LayerCategory),
    Size(u32),
    Paint(i64, i64),
    Line(i64, i64, i64, i64),
    Down(i64, i64),
    Move(i64, i64),
    Up,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyStatus {
    /// Applied; `changed` is true if any pixel changed category.
    Applied { changed: bool },
    Incomplete,     // valid so far, but needs more tokens
    NotEditCommand, // doesn't look like edit syntax
}

fn lex(input: &str) -> Vec<&str> {
    let code = input.split('#').next().unwrap_or("");
    code.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect()
}

fn numbers<const N: usize>(args: &[&str]) -> Result<[i64; N], ApplyStatus> {
    let mut out = [0; N];
    for (i, slot) in out.iter_mut().enumerate() {
        let Some(tok) = args.get(i) else {
            return Err(ApplyStatus::Incomplete);
        };
        *slot = tok.parse().map_err(|_| ApplyStatus::NotEditCommand)?;
    }
    if args.len() > N {
        return Err(ApplyStatus::NotEditCommand);
    }
    Ok(out)
}

/// Grammar:
///
/// ```text
/// layer <silk|pad|trace|mask|substrate|0..4>
/// size <radius>
/// paint <x> <y>
/// line <x0> <y0> <x1> <y1>
/// down <x> <y> | move <x> <y> | up
/// ```
///
/// Commas separate like whitespace; `#` starts a comment.
pub fn parse_edit_line(line: &str) -> Result<EditCommand, ApplyStatus> {
    let tokens = lex(line);
    let Some((head, args)) = tokens.split_first() else {
        return Err(ApplyStatus::NotEditCommand);
    };

    let cmd = match head.to_lowercase().as_str() {
        "layer" => {
            let name = args.first().ok_or(ApplyStatus::Incomplete)?;
            if args.len() > 1 {
                return Err(ApplyStatus::NotEditCommand);
            }
            let category = LayerCategory::parse(name).ok_or(ApplyStatus::NotEditCommand)?;
            EditCommand::Layer(category)
        }
        "size" => {
            let [r] = numbers::<1>(args)?;
            let r = u32::try_from(r).map_err(|_| ApplyStatus::NotEditCommand)?;
            EditCommand::Size(r)
        }
        "paint" => {
            let [x, y] = numbers::<2>(args)?;
            EditCommand::Paint(x, y)
        }
        "line" => {
            let [x0, y0, x1, y1] = numbers::<4>(args)?;
            EditCommand::Line(x0, y0, x1, y1)
        }
        "down" => {
            let [x, y] = numbers::<2>(args)?;
            EditCommand::Down(x, y)
        }
        "move" => {
            let [x, y] = numbers::<2>(args)?;
            EditCommand::Move(x, y)
        }
        "up" if args.is_empty() => EditCommand::Up,
        _ => return Err(ApplyStatus::NotEditCommand),
    };

    Ok(cmd)
}

pub fn apply_edit_command(cmd: EditCommand, session: &mut Session) -> bool {
    match cmd {
        EditCommand::Layer(category) => {
            session.brush.category = category;
            false
        }
        EditCommand::Size(r) => {
            session.brush.set_radius(r);
            false
        }
        EditCommand::Paint(x, y) => session.paint_at(x, y),
        EditCommand::Line(x0, y0, x1, y1) => session.paint_line((x0, y0), (x1, y1)),
        EditCommand::Down(x, y) => session.pointer_down(x, y),
        EditCommand::Move(x, y) => session.pointer_move(x, y),
        EditCommand::Up => {
            session.pointer_up();
            false
        }
    }
}

pub fn try_apply_edit_line(line: &str, session: &mut Session) -> ApplyStatus {
    match parse_edit_line(line) {
        Ok(cmd) => ApplyStatus::Applied {
            changed: apply_edit_command(cmd, session),
        },
        Err(status) => status,
    }
}
