use std::path::PathBuf;

use super::super::builtins::Builtin;

/// One command plus its arguments within a pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stage {
    pub command: String,
    pub args: Vec<String>,
}

impl Stage {
    /// Build a stage from a whitespace-separated segment
    pub fn from_segment(segment: &str) -> Self {
        let mut words = segment.split_whitespace().map(String::from);
        Stage {
            command: words.next().unwrap_or_default(),
            args: words.collect(),
        }
    }

    /// Stages with no command word are never executed
    pub fn is_empty(&self) -> bool {
        self.command.is_empty()
    }
}

/// Ordered stages whose outputs feed the next stage's input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Delimiter between stages. Pipes must be surrounded by single spaces, which holds for any
    /// line produced by the input reader since it rejoins tokens with one space.
    pub const DELIMITER: &'static str = " | ";

    /// Split a normalized line into stages.
    ///
    /// Empty segments (leading, trailing or doubled pipes) produce empty stages that the
    /// executor skips.
    pub fn split(line: &str) -> Self {
        Pipeline {
            stages: line.split(Self::DELIMITER).map(Stage::from_segment).collect(),
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Iterate over the stages that will actually run
    pub fn runnable(&self) -> impl Iterator<Item = &Stage> {
        self.stages.iter().filter(|stage| !stage.is_empty())
    }
}

/// Outcome of looking a command name up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Run in the shell's own process
    Builtin(Builtin),
    /// Path to hand to execve; for direct paths this may not exist yet
    External(PathBuf),
    NotFound,
}
