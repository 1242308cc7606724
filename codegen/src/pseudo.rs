// Pseudo-assembly operand and instruction definitions
use std::fmt;

/// Generated temporary, rendered `t<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Temp(pub usize);

impl fmt::Display for Temp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Generated jump target, already unique within one generator run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(pub String);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Int(i64),
    Float(f64),
    Bool(bool),
    Var(String),
    Temp(Temp),
    Ret, // reserved return-value slot
    // Textual negation: a `-` prefix on the operand's text, not an arithmetic negation
    Negated(Box<Operand>),
}

impl Operand {
    pub fn negated(self) -> Self {
        Operand::Negated(Box::new(self))
    }
}

impl From<Temp> for Operand {
    fn from(temp: Temp) -> Self {
        Operand::Temp(temp)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{:?}", x),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Var(name) => f.write_str(name),
            Self::Temp(t) => write!(f, "{}", t),
            Self::Ret => f.write_str("ret"),
            Self::Negated(inner) => write!(f, "-{}", inner),
        }
    }
}

/// Relation written by a SET instruction after a CMP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,
}

impl Condition {
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Less => "L",
            Self::Greater => "G",
            Self::LessEqual => "LE",
            Self::GreaterEqual => "GE",
            Self::Equal => "E",
            Self::NotEqual => "NE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Label(Label),
    Mov(Operand, Operand),
    Add(Operand, Operand, Operand),
    Mul(Operand, Operand, Operand),
    Div(Operand, Operand, Operand),
    Cmp(Operand, Operand),
    Je(Label),
    Jl(Label),
    Jmp(Label),
    Set(Condition, Operand),
    And(Operand, Operand, Operand),
    Or(Operand, Operand, Operand),
    // `dst` is None for call statements and the entry call
    Call {
        name: String,
        args: Vec<Operand>,
        dst: Option<Temp>,
    },
    Ret,
    Halt,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(l) => write!(f, "LABEL {}", l),
            Self::Mov(d, s) => write!(f, "MOV {}, {}", d, s),
            Self::Add(d, a, b) => write!(f, "ADD {}, {}, {}", d, a, b),
            Self::Mul(d, a, b) => write!(f, "MUL {}, {}, {}", d, a, b),
            Self::Div(d, a, b) => write!(f, "DIV {}, {}, {}", d, a, b),
            Self::Cmp(a, b) => write!(f, "CMP {}, {}", a, b),
            Self::Je(l) => write!(f, "JE {}", l),
            Self::Jl(l) => write!(f, "JL {}", l),
            Self::Jmp(l) => write!(f, "JMP {}", l),
            Self::Set(c, d) => write!(f, "SET{} {}", c.suffix(), d),
            Self::And(d, a, b) => write!(f, "AND {}, {}, {}", d, a, b),
            Self::Or(d, a, b) => write!(f, "OR {}, {}, {}", d, a, b),
            Self::Call { name, args, dst } => {
                write!(f, "CALL {}", name)?;
                for arg in args {
                    write!(f, ", {}", arg)?;
                }
                if let Some(dst) = dst {
                    write!(f, " -> {}", dst)?;
                }
                Ok(())
            }
            Self::Ret => f.write_str("RET"),
            Self::Halt => f.write_str("HALT"),
        }
    }
}

/// One text line per instruction
pub fn render(instructions: &[Instruction]) -> Vec<String> {
    instructions.iter().map(ToString::to_string).collect()
}

/// emit converts a listing to newline-terminated text
pub fn emit(instructions: &[Instruction]) -> String {
    use fmt::Write;
    let mut s = String::new();
    for instr in instructions {
        let _ = writeln!(s, "{}", instr);
    }
    s
}
