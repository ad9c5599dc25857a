//! Reading the indented object and command lines of an `[Events]` section.

use super::{
    command::{Command, parse_commands},
    object::{ObjectKind, StoryboardObject},
};
use crate::{
    config::ParseConfig,
    error::{ParseError, ParseResult, Positioned},
    reader::LineSource,
};

/// Number of leading indentation markers. Spaces and underscores count the same.
fn indent_depth(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '_']).len()
}

/// An object line and the loops and triggers still accepting children, outermost first.
struct OpenObject {
    object: StoryboardObject,
    blocks: Vec<Command>,
}

impl OpenObject {
    const fn new(object: StoryboardObject) -> Self {
        Self {
            object,
            blocks: vec![],
        }
    }

    /// Appends to the innermost open block, or to the object itself.
    fn append(&mut self, command: Command) {
        match self.blocks.last_mut().and_then(Command::children_mut) {
            Some(children) => children.push(command),
            None => self.object.commands.push(command),
        }
    }

    fn close_innermost(&mut self) {
        if let Some(block) = self.blocks.pop() {
            self.append(block);
        }
    }

    fn finish(mut self) -> StoryboardObject {
        while !self.blocks.is_empty() {
            self.close_innermost();
        }
        self.object
    }

    /// Files the commands of a line at `depth`, closing blocks this line leaves.
    fn accept(&mut self, depth: usize, commands: Vec<Command>) -> Result<(), ParseError> {
        while self.blocks.len() >= depth {
            self.close_innermost();
        }
        if self.blocks.len() + 1 < depth {
            return Err(ParseError::malformed(format!(
                "indentation depth {depth} has no enclosing loop or trigger"
            )));
        }
        for command in commands {
            if command.is_container() {
                self.blocks.push(command);
            } else {
                self.append(command);
            }
        }
        Ok(())
    }
}

/// Reads objects until an empty line, a section header or the end of input.
///
/// A section header line is pushed back for the caller. Variables are substituted before
/// each line is parsed. With a legacy format version, object times and the times of
/// commands directly under an object are moved by the legacy offset; times nested in
/// loops and triggers are relative and stay as written.
///
/// # Errors
///
/// Returns the first [`ParseError`] with the position of the offending line. Objects
/// are only returned when the whole section parses.
pub fn parse_events<'a>(
    reader: &mut impl LineSource<'a>,
    config: &ParseConfig,
) -> ParseResult<Vec<StoryboardObject>> {
    let offset = config.time_offset();
    let mut objects = vec![];
    let mut current: Option<OpenObject> = None;
    while let Some(raw) = reader.read_line() {
        if raw.is_empty() {
            break;
        }
        if raw.starts_with('[') {
            reader.pushback();
            break;
        }
        let line = reader.substitute_variables(raw);
        let depth = indent_depth(&line);
        let body = line.get(depth..).unwrap_or_default();
        log::trace!("events line {}: depth {depth}", reader.line_number());
        if depth == 0 {
            let mut kind = ObjectKind::parse(body).map_err(|e| Positioned::at(e, &*reader))?;
            kind.shift_times(offset);
            if let Some(done) = current.replace(OpenObject::new(StoryboardObject::new(kind))) {
                objects.push(done.finish());
            }
            continue;
        }
        if body.trim().is_empty() {
            return Err(Positioned::at(
                ParseError::malformed("indentation without a command"),
                &*reader,
            ));
        }
        let Some(open) = current.as_mut() else {
            return Err(Positioned::at(
                ParseError::malformed("command line before any object"),
                &*reader,
            ));
        };
        let mut commands = parse_commands(body).map_err(|e| Positioned::at(e, &*reader))?;
        if depth == 1 {
            for command in &mut commands {
                command.shift_times(offset);
            }
        }
        open.accept(depth, commands)
            .map_err(|e| Positioned::at(e, &*reader))?;
    }
    objects.extend(current.map(OpenObject::finish));
    log::debug!("parsed {} storyboard objects", objects.len());
    Ok(objects)
}
