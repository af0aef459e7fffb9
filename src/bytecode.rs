//! The instruction set compiled programs are lowered to, and the VM
//! executes. `LoadConst`/attribute-name opcodes index into a single
//! constant pool (`Vec<Value>`) shared by the whole compiled unit.
use crate::value::Value;

#[derive(Clone)]
pub enum OpCode {
    Push(Value),
    Pop,
    Dup,
    /// Duplicates the top two stack elements, preserving order. Used by
    /// compound index assignment (`a[i] += v`) to keep `object`/`index`
    /// live across the read-modify-write sequence.
    Dup2,

    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Neg,

    Eq,
    NotEq,
    Lt,
    Gt,
    Le,
    Ge,
    Not,

    BitAnd,
    BitOr,
    BitXor,
    BitNot,
    Shl,
    Shr,

    /// Name-keyed local binding inside the current call frame.
    Load(String),
    Store(String),
    /// `(name, slot)` — the slot index is carried for parity with the
    /// compiler's local-slot table but frames are name-keyed, not
    /// slot-indexed, matching how the original VM actually executes these.
    Define(String, usize),

    LoadConst(usize),

    Jump(usize),
    /// Pops its operand unconditionally, branch taken or not.
    JumpIfFalse(usize),
    JumpIfTrue(usize),

    Call(usize),
    Return,

    BuildList(usize),
    BuildMap(usize),
    Index,
    StoreIndex,

    GetAttr(usize),
    SetAttr(usize),

    /// Dedicated length opcode used by `for`-loop lowering instead of the
    /// `GET_ATTR "__len__"` approach, which silently returns `none` (falsy)
    /// for any list/map/string and turns every for-loop into a zero-iteration
    /// loop.
    Len,

    Halt,
    Nop,
}

impl std::fmt::Debug for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpCode::Push(v) => write!(f, "PUSH {v}"),
            OpCode::Pop => write!(f, "POP"),
            OpCode::Dup => write!(f, "DUP"),
            OpCode::Dup2 => write!(f, "DUP2"),
            OpCode::Add => write!(f, "ADD"),
            OpCode::Sub => write!(f, "SUB"),
            OpCode::Mul => write!(f, "MUL"),
            OpCode::Div => write!(f, "DIV"),
            OpCode::Mod => write!(f, "MOD"),
            OpCode::Pow => write!(f, "POW"),
            OpCode::Neg => write!(f, "NEG"),
            OpCode::Eq => write!(f, "EQ"),
            OpCode::NotEq => write!(f, "NEQ"),
            OpCode::Lt => write!(f, "LT"),
            OpCode::Gt => write!(f, "GT"),
            OpCode::Le => write!(f, "LE"),
            OpCode::Ge => write!(f, "GE"),
            OpCode::Not => write!(f, "NOT"),
            OpCode::BitAnd => write!(f, "BAND"),
            OpCode::BitOr => write!(f, "BOR"),
            OpCode::BitXor => write!(f, "BXOR"),
            OpCode::BitNot => write!(f, "BNOT"),
            OpCode::Shl => write!(f, "SHL"),
            OpCode::Shr => write!(f, "SHR"),
            OpCode::Load(name) => write!(f, "LOAD {name}"),
            OpCode::Store(name) => write!(f, "STORE {name}"),
            OpCode::Define(name, slot) => write!(f, "DEFINE {name} ({slot})"),
            OpCode::LoadConst(idx) => write!(f, "LOAD_CONST {idx}"),
            OpCode::Jump(target) => write!(f, "JUMP {target}"),
            OpCode::JumpIfFalse(target) => write!(f, "JUMP_IF_FALSE {target}"),
            OpCode::JumpIfTrue(target) => write!(f, "JUMP_IF_TRUE {target}"),
            OpCode::Call(argc) => write!(f, "CALL {argc}"),
            OpCode::Return => write!(f, "RETURN"),
            OpCode::BuildList(n) => write!(f, "BUILD_LIST {n}"),
            OpCode::BuildMap(n) => write!(f, "BUILD_MAP {n}"),
            OpCode::Index => write!(f, "INDEX"),
            OpCode::StoreIndex => write!(f, "STORE_INDEX"),
            OpCode::GetAttr(idx) => write!(f, "GET_ATTR {idx}"),
            OpCode::SetAttr(idx) => write!(f, "SET_ATTR {idx}"),
            OpCode::Len => write!(f, "LEN"),
            OpCode::Halt => write!(f, "HALT"),
            OpCode::Nop => write!(f, "NOP"),
        }
    }
}
