//! Simple Batch command keywords.
//!
//! Keywords are looked up once per line, case-insensitively, into a closed
//! enum so the executor can match exhaustively.  `ST`, `FLR` and `NOT` are
//! accepted as aliases of `SET`, `TOINT` and `ISFALSE`.

use std::str::FromStr;

// ── Command ───────────────────────────────────────────────────────────────────

/// A Simple Batch command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // Memory
    Var,
    Set,
    Stc,
    // Conversions
    ToInt,
    Rnd,
    Ceil,
    Char,
    Parse,
    Str,
    Hex,
    Bin,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Random,
    // Bitwise
    Shl,
    Shr,
    INot,
    IAnd,
    IOr,
    IXor,
    // Boolean
    IsTrue,
    IsFalse,
    And,
    Or,
    Xor,
    // Text
    StrGet,
    StrLen,
    SubStr,
    // Relational and type tests
    IsEq,
    IsLt,
    IsGt,
    TypInt,
    TypFlt,
    TypStr,
    // Control flow
    If,
    EndIf,
    Goto,
    Pos,
    Quit,
    Rem,
    // Host effects
    Exe,
    Log,
    LogW,
    LogE,
    Echo,
    Cls,
}

impl Command {
    /// Every command, in table order.
    pub const ALL: &'static [Command] = &[
        Command::Var,
        Command::Set,
        Command::Stc,
        Command::ToInt,
        Command::Rnd,
        Command::Ceil,
        Command::Char,
        Command::Parse,
        Command::Str,
        Command::Hex,
        Command::Bin,
        Command::Add,
        Command::Sub,
        Command::Mul,
        Command::Div,
        Command::Mod,
        Command::Random,
        Command::Shl,
        Command::Shr,
        Command::INot,
        Command::IAnd,
        Command::IOr,
        Command::IXor,
        Command::IsTrue,
        Command::IsFalse,
        Command::And,
        Command::Or,
        Command::Xor,
        Command::StrGet,
        Command::StrLen,
        Command::SubStr,
        Command::IsEq,
        Command::IsLt,
        Command::IsGt,
        Command::TypInt,
        Command::TypFlt,
        Command::TypStr,
        Command::If,
        Command::EndIf,
        Command::Goto,
        Command::Pos,
        Command::Quit,
        Command::Rem,
        Command::Exe,
        Command::Log,
        Command::LogW,
        Command::LogE,
        Command::Echo,
        Command::Cls,
    ];

    /// The canonical uppercase keyword.
    pub fn name(self) -> &'static str {
        match self {
            Command::Var     => "VAR",
            Command::Set     => "SET",
            Command::Stc     => "STC",
            Command::ToInt   => "TOINT",
            Command::Rnd     => "RND",
            Command::Ceil    => "CEIL",
            Command::Char    => "CHAR",
            Command::Parse   => "PARSE",
            Command::Str     => "STR",
            Command::Hex     => "HEX",
            Command::Bin     => "BIN",
            Command::Add     => "ADD",
            Command::Sub     => "SUB",
            Command::Mul     => "MUL",
            Command::Div     => "DIV",
            Command::Mod     => "MOD",
            Command::Random  => "RANDOM",
            Command::Shl     => "SHL",
            Command::Shr     => "SHR",
            Command::INot    => "INOT",
            Command::IAnd    => "IAND",
            Command::IOr     => "IOR",
            Command::IXor    => "IXOR",
            Command::IsTrue  => "ISTRUE",
            Command::IsFalse => "ISFALSE",
            Command::And     => "AND",
            Command::Or      => "OR",
            Command::Xor     => "XOR",
            Command::StrGet  => "STRGET",
            Command::StrLen  => "STRLEN",
            Command::SubStr  => "SUBSTR",
            Command::IsEq    => "ISEQ",
            Command::IsLt    => "ISLT",
            Command::IsGt    => "ISGT",
            Command::TypInt  => "TYPINT",
            Command::TypFlt  => "TYPFLT",
            Command::TypStr  => "TYPSTR",
            Command::If      => "IF",
            Command::EndIf   => "ENDIF",
            Command::Goto    => "GOTO",
            Command::Pos     => "POS",
            Command::Quit    => "QUIT",
            Command::Rem     => "REM",
            Command::Exe     => "EXE",
            Command::Log     => "LOG",
            Command::LogW    => "LOGW",
            Command::LogE    => "LOGE",
            Command::Echo    => "ECHO",
            Command::Cls     => "CLS",
        }
    }

    /// Case-insensitive lookup, including aliases.  `None` for unknown names.
    pub fn lookup(name: &str) -> Option<Command> {
        let upper = name.to_ascii_uppercase();
        match upper.as_str() {
            "ST" => return Some(Command::Set),
            "FLR" => return Some(Command::ToInt),
            "NOT" => return Some(Command::IsFalse),
            _ => {}
        }
        Command::ALL.iter().copied().find(|c| c.name() == upper)
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        Command::lookup(s).ok_or_else(|| format!("\"{s}\" is not a recognized Simple Batch command"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
