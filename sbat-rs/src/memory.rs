//! Script memory and the variable table.
//!
//! A run owns one [`Memory`]: 107 slots, each always holding a [`Value`].
//!
//! | Slots   | Meaning                                   | Writable |
//! |---------|-------------------------------------------|----------|
//! | 0-9     | invocation arguments (0 = script name)    | no       |
//! | 10-99   | general purpose, named by `VAR` in order  | yes      |
//! | 100     | the register                              | yes      |
//! | 101-106 | environment snapshot supplied by the host | no       |

use std::fmt::Write as _;

use crate::error::ErrorKind;
use crate::script::value::Value;

/// Total number of slots.
pub const SLOT_COUNT: usize = 107;
/// Number of invocation-argument slots.
pub const ARG_SLOTS: usize = 10;
/// First slot handed out by `VAR`.
pub const FIRST_VAR_SLOT: usize = 10;
/// The register.
pub const REGISTER: usize = 100;

/// Names that always resolve to a fixed slot, outside the variable table.
const RESERVED: [(&str, usize); 7] = [
    ("REGISTER", 100),
    ("DATE", 101),
    ("TIME", 102),
    ("IN_DESIGNER", 103),
    ("IN_LEVEL", 104),
    ("LEVEL_NAME", 105),
    ("MAP_NAME", 106),
];

// ── Environment ───────────────────────────────────────────────────────────────

/// Host state captured once at the start of a run (slots 101-106).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    pub date: String,
    pub time: String,
    pub in_designer: bool,
    pub in_level: bool,
    pub level_name: String,
    pub map_name: String,
}

// ── Memory ────────────────────────────────────────────────────────────────────

/// The slots of one run plus its variable table.
#[derive(Debug, Clone, PartialEq)]
pub struct Memory {
    slots: Vec<Value>,
    /// Declared names, in declaration order; entry `i` names slot `10 + i`.
    names: Vec<String>,
}

impl Memory {
    /// Fresh memory for a run.  Missing invocation arguments are Integer 0.
    pub fn new(args: &[Value], env: &Environment) -> Self {
        let mut slots = vec![Value::Int(0); SLOT_COUNT];
        for (slot, arg) in slots.iter_mut().zip(args.iter().take(ARG_SLOTS)) {
            *slot = arg.clone();
        }
        slots[101] = Value::Text(env.date.clone());
        slots[102] = Value::Text(env.time.clone());
        slots[103] = Value::from(env.in_designer);
        slots[104] = Value::from(env.in_level);
        slots[105] = Value::Text(env.level_name.clone());
        slots[106] = Value::Text(env.map_name.clone());
        Self {
            slots,
            names: Vec::new(),
        }
    }

    /// Read a slot.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.slots.get(index)
    }

    pub fn register(&self) -> &Value {
        &self.slots[REGISTER]
    }

    pub fn set_register(&mut self, value: Value) {
        self.slots[REGISTER] = value;
    }

    /// Write `value` to a destination address taken from a script.
    ///
    /// Only general-purpose slots and the register accept writes.
    pub fn store(&mut self, address: i32, value: Value) -> Result<(), ErrorKind> {
        let index = usize::try_from(address)
            .ok()
            .filter(|&i| i < SLOT_COUNT)
            .ok_or_else(|| ErrorKind::range(format!("address {address} is outside memory")))?;
        if !(FIRST_VAR_SLOT..=REGISTER).contains(&index) {
            return Err(ErrorKind::ReadOnlySlot(index));
        }
        self.slots[index] = value;
        Ok(())
    }

    /// Name the next free general-purpose slot and give it `value`.
    pub fn declare(&mut self, name: &str, value: Value) -> Result<usize, ErrorKind> {
        let index = FIRST_VAR_SLOT + self.names.len();
        if index >= REGISTER {
            return Err(ErrorKind::MemoryExhausted);
        }
        if name.is_empty() || name.starts_with('%') || name.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(ErrorKind::InvalidName(name.to_owned()));
        }
        self.names.push(name.to_owned());
        self.slots[index] = value;
        Ok(index)
    }

    /// Resolve a name to its slot: reserved names first, then the first
    /// declaration with that name.
    pub fn lookup(&self, name: &str) -> Option<usize> {
        RESERVED
            .iter()
            .find(|(reserved, _)| *reserved == name)
            .map(|&(_, index)| index)
            .or_else(|| {
                self.names
                    .iter()
                    .position(|n| n == name)
                    .map(|i| FIRST_VAR_SLOT + i)
            })
    }

    /// Number of declared variables.
    pub fn declared(&self) -> usize {
        self.names.len()
    }

    /// Display name of a slot: the declared name, the decimal index for
    /// undeclared general-purpose slots, `None` for argument slots.
    pub fn slot_name(&self, index: usize) -> Option<String> {
        match index {
            0..=9 => None,
            10..=99 => Some(
                self.names
                    .get(index - FIRST_VAR_SLOT)
                    .cloned()
                    .unwrap_or_else(|| index.to_string()),
            ),
            _ => RESERVED
                .iter()
                .find(|&&(_, i)| i == index)
                .map(|&(name, _)| name.to_owned()),
        }
    }

    /// Human-readable listing of the register and slots 0-99.
    pub fn dump(&self) -> String {
        let reg = self.register();
        let mut out = format!(
            "Memory dump of Simple Batch Interpreter:\nRegister: [{}] {}",
            reg.type_name(),
            reg
        );
        for (index, value) in self.slots.iter().enumerate().take(REGISTER) {
            let name = self.slot_name(index).unwrap_or_else(|| "unnamed".to_owned());
            let _ = write!(out, "\nIndex {index:02} ({name}): [{}] {value}", value.type_name());
        }
        out
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Memory {
        Memory::new(&[Value::Text("PROG".into())], &Environment::default())
    }

    #[test]
    fn initial_layout() {
        let env = Environment {
            date: "Monday".into(),
            time: "12:00".into(),
            in_designer: true,
            in_level: false,
            level_name: "L1".into(),
            map_name: "M1".into(),
        };
        let mem = Memory::new(&[Value::Text("PROG".into()), Value::Int(7)], &env);
        assert_eq!(mem.get(0), Some(&Value::Text("PROG".into())));
        assert_eq!(mem.get(1), Some(&Value::Int(7)));
        assert_eq!(mem.get(9), Some(&Value::Int(0)));
        assert_eq!(mem.get(50), Some(&Value::Int(0)));
        assert_eq!(mem.register(), &Value::Int(0));
        assert_eq!(mem.get(101), Some(&Value::Text("Monday".into())));
        assert_eq!(mem.get(103), Some(&Value::Int(1)));
        assert_eq!(mem.get(104), Some(&Value::Int(0)));
        assert_eq!(mem.get(106), Some(&Value::Text("M1".into())));
        assert_eq!(mem.get(107), None);
    }

    #[test]
    fn store_respects_zones() {
        let mut mem = fresh();
        assert!(mem.store(20, Value::Int(8)).is_ok());
        assert_eq!(mem.get(20), Some(&Value::Int(8)));
        assert!(mem.store(100, Value::Int(1)).is_ok());
        assert_eq!(mem.register(), &Value::Int(1));
        assert_eq!(mem.store(3, Value::Int(1)), Err(ErrorKind::ReadOnlySlot(3)));
        assert_eq!(mem.store(101, Value::Int(1)), Err(ErrorKind::ReadOnlySlot(101)));
        assert!(matches!(mem.store(107, Value::Int(1)), Err(ErrorKind::Range(_))));
        assert!(matches!(mem.store(-1, Value::Int(1)), Err(ErrorKind::Range(_))));
    }

    #[test]
    fn declare_and_lookup() {
        let mut mem = fresh();
        assert_eq!(mem.declare("count", Value::Int(3)), Ok(10));
        assert_eq!(mem.declare("name", Value::Text("Ada".into())), Ok(11));
        assert_eq!(mem.lookup("count"), Some(10));
        assert_eq!(mem.lookup("name"), Some(11));
        assert_eq!(mem.get(11), Some(&Value::Text("Ada".into())));
        assert_eq!(mem.lookup("missing"), None);
    }

    #[test]
    fn duplicate_name_resolves_to_first() {
        let mut mem = fresh();
        mem.declare("x", Value::Int(1)).unwrap();
        mem.declare("x", Value::Int(2)).unwrap();
        assert_eq!(mem.lookup("x"), Some(10));
    }

    #[test]
    fn reserved_names() {
        let mem = fresh();
        assert_eq!(mem.lookup("REGISTER"), Some(100));
        assert_eq!(mem.lookup("DATE"), Some(101));
        assert_eq!(mem.lookup("MAP_NAME"), Some(106));
    }

    #[test]
    fn invalid_names() {
        let mut mem = fresh();
        assert!(matches!(mem.declare("%x", Value::Int(0)), Err(ErrorKind::InvalidName(_))));
        assert!(matches!(mem.declare("9lives", Value::Int(0)), Err(ErrorKind::InvalidName(_))));
        assert!(matches!(mem.declare("", Value::Int(0)), Err(ErrorKind::InvalidName(_))));
    }

    #[test]
    fn capacity_is_ninety() {
        let mut mem = fresh();
        for i in 0..90 {
            assert!(mem.declare(&format!("v{i}"), Value::Int(i)).is_ok());
        }
        assert_eq!(mem.declared(), 90);
        assert_eq!(mem.declare("one_more", Value::Int(0)), Err(ErrorKind::MemoryExhausted));
    }

    #[test]
    fn slot_names() {
        let mut mem = fresh();
        mem.declare("first", Value::Int(0)).unwrap();
        assert_eq!(mem.slot_name(0), None);
        assert_eq!(mem.slot_name(10).as_deref(), Some("first"));
        assert_eq!(mem.slot_name(11).as_deref(), Some("11"));
        assert_eq!(mem.slot_name(100).as_deref(), Some("REGISTER"));
    }

    #[test]
    fn dump_lists_register_and_slots() {
        let mut mem = fresh();
        mem.declare("greeting", Value::Text("hi".into())).unwrap();
        let dump = mem.dump();
        assert!(dump.starts_with("Memory dump of Simple Batch Interpreter:\nRegister: [Integer] 0"));
        assert!(dump.contains("\nIndex 00 (unnamed): [Text] PROG"));
        assert!(dump.contains("\nIndex 10 (greeting): [Text] hi"));
        assert!(dump.contains("\nIndex 99 (99): [Integer] 0"));
        assert_eq!(dump.lines().count(), 102);
    }
}
