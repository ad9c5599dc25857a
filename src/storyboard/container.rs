//! Ordered command lists owned by objects, loops and triggers.

use itertools::Itertools;

use super::command::Command;
use crate::{config::RenderConfig, error::SerializationError};

/// Commands in the order they were read or pushed. Storage is never re-sorted, so
/// rendering reproduces the original grouping of lines.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CommandContainer {
    commands: Vec<Command>,
}

impl CommandContainer {
    /// An empty container.
    #[must_use]
    pub const fn new() -> Self {
        Self { commands: vec![] }
    }

    /// Appends a command.
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether there are no direct children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Direct children in stored order.
    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }

    /// Mutable direct children in stored order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Command> {
        self.commands.iter_mut()
    }

    /// Direct children as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Command] {
        &self.commands
    }

    /// The most recently appended child.
    #[must_use]
    pub fn last(&self) -> Option<&Command> {
        self.commands.last()
    }

    /// The most recently appended child, mutably.
    pub fn last_mut(&mut self) -> Option<&mut Command> {
        self.commands.last_mut()
    }

    /// Direct children whose span `[start_time, end_time]` contains `time`, in stored
    /// order. Loop spans cover every iteration.
    pub fn active_at(&self, time: i32) -> impl Iterator<Item = &Command> {
        self.commands
            .iter()
            .filter(move |command| command.start_time() <= time && time <= command.end_time())
    }

    /// Renders the commands at `depth` indentation markers, children at `depth + 1`.
    ///
    /// Consecutive transforms with the same tag, easing, start and end time share one
    /// line, each contributing a full `start,end` value group.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError`] when a value has no textual form.
    pub fn render(
        &self,
        depth: usize,
        config: &RenderConfig,
    ) -> Result<Vec<String>, SerializationError> {
        let mut lines = vec![];
        self.render_into(depth, 0, config, &mut lines)?;
        Ok(lines)
    }

    /// Renders with the direct children's own times moved by `delta`.
    pub(crate) fn render_into(
        &self,
        depth: usize,
        delta: i32,
        config: &RenderConfig,
        lines: &mut Vec<String>,
    ) -> Result<(), SerializationError> {
        let indent = config.indentation(depth);
        let runs = self
            .commands
            .iter()
            .enumerate()
            .chunk_by(|(index, command)| command.run_key().ok_or(*index));
        for (_, mut run) in &runs {
            let Some((_, first)) = run.next() else {
                continue;
            };
            let mut line = format!("{indent}{}", first.head(delta));
            first.write_values(&mut line)?;
            for (_, command) in run {
                command.write_values(&mut line)?;
            }
            lines.push(line);
            if let Some(children) = first.children() {
                children.render_into(depth + 1, 0, config, lines)?;
            }
        }
        Ok(())
    }
}

impl From<Vec<Command>> for CommandContainer {
    fn from(commands: Vec<Command>) -> Self {
        Self { commands }
    }
}

impl FromIterator<Command> for CommandContainer {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        Self {
            commands: iter.into_iter().collect(),
        }
    }
}

impl Extend<Command> for CommandContainer {
    fn extend<I: IntoIterator<Item = Command>>(&mut self, iter: I) {
        self.commands.extend(iter);
    }
}

impl<'a> IntoIterator for &'a CommandContainer {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

impl IntoIterator for CommandContainer {
    type Item = Command;
    type IntoIter = std::vec::IntoIter<Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}
