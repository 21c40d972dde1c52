//! The embedded instruction model a guest [`Process`](crate::process::Process)
//! executes. See `original_source/Instruction.h` for the representation this
//! was distilled from.

/// One instruction in a guest program.
///
/// Immutable once constructed. `For` is the only variant that owns a nested
/// body; everything else is a flat kind + argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `PRINT` — no arguments.
    Print,
    /// `DECLARE name value`.
    Declare { args: Vec<String> },
    /// `ADD dest a b`.
    Add { args: Vec<String> },
    /// `SUBTRACT dest a b`.
    Subtract { args: Vec<String> },
    /// `SLEEP ticks`.
    Sleep { args: Vec<String> },
    /// `FOR n { body }` — `repeat` is the iteration count, `body` the
    /// sequence of instructions run on each iteration.
    For {
        repeat: u32,
        body: Vec<Instruction>,
    },
}

impl Instruction {
    /// Short uppercase tag used in log entries (`"PRINT"`, `"FOR"`, ...).
    pub fn kind_name(&self) -> &'static str {
        match self {
            Instruction::Print => "PRINT",
            Instruction::Declare { .. } => "DECLARE",
            Instruction::Add { .. } => "ADD",
            Instruction::Subtract { .. } => "SUBTRACT",
            Instruction::Sleep { .. } => "SLEEP",
            Instruction::For { .. } => "FOR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_match_spec_tags() {
        assert_eq!(Instruction::Print.kind_name(), "PRINT");
        assert_eq!(
            Instruction::Declare { args: vec![] }.kind_name(),
            "DECLARE"
        );
        assert_eq!(
            Instruction::For { repeat: 0, body: vec![] }.kind_name(),
            "FOR"
        );
    }

    #[test]
    fn for_owns_nested_body() {
        let nested = Instruction::For {
            repeat: 2,
            body: vec![Instruction::Print, Instruction::Print],
        };
        match nested {
            Instruction::For { repeat, body } => {
                assert_eq!(repeat, 2);
                assert_eq!(body.len(), 2);
            }
            _ => panic!("expected For"),
        }
    }
}
