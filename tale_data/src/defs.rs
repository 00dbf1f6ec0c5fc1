use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Stable identifier used across Definition references.
pub type Id = String;

/// 1-based source location of a declaration or expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Top-level compiled world data handed to an execution engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Definition {
    #[serde(default)]
    pub variables: BTreeMap<String, VariableDef>,
    #[serde(default)]
    pub items: BTreeMap<Id, ItemDef>,
    #[serde(default)]
    pub rooms: BTreeMap<Id, RoomDef>,
    #[serde(default)]
    pub commands: Vec<CommandDef>,
    #[serde(default)]
    pub scripts: BTreeMap<Id, ScriptDef>,
    /// Room the player starts in; empty until the start-location variable is assigned.
    #[serde(default)]
    pub player_start_location: Id,
}

/// The four literal kinds a value can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    Number,
    String,
    Bool,
    Id,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Bool => "boolean",
            ValueType::Id => "identifier",
        };
        f.write_str(name)
    }
}

/// A literal value as written in the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Number(f64),
    Text(String),
    Boolean(bool),
    /// Reference to a declared symbol by name.
    IdRef(Id),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Number(_) => ValueType::Number,
            Value::Text(_) => ValueType::String,
            Value::Boolean(_) => ValueType::Bool,
            Value::IdRef(_) => ValueType::Id,
        }
    }

    pub fn as_id(&self) -> Option<&str> {
        match self {
            Value::IdRef(id) => Some(id),
            _ => None,
        }
    }
}

/// A top-level `VAR` assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDef {
    pub declared_type: ValueType,
    pub value: Value,
    pub position: Position,
}

/// Ways the player may interact with an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InteractionFlag {
    Takeable,
}

/// Item definition with its starting placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: Id,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub initial_location: Option<Id>,
    #[serde(default)]
    pub interaction_flags: BTreeSet<InteractionFlag>,
    pub position: Position,
}

impl ItemDef {
    pub fn is_takeable(&self) -> bool {
        self.interaction_flags.contains(&InteractionFlag::Takeable)
    }
}

/// Room definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDef {
    pub id: Id,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub position: Position,
}

/// What happens when the player enters a command verb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandEffect {
    CallScript { script_id: Id },
}

/// A player command bound to an effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDef {
    pub verb: String,
    pub effect: CommandEffect,
    pub position: Position,
}

/// A named script with its compiled body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptDef {
    pub id: Id,
    #[serde(default)]
    pub body: Block,
    pub position: Position,
}

/// Ordered sequence of script actions.
pub type Block = Vec<ScriptAction>;

/// Reference expression that evaluates to a location inside the definition's data.
///
/// Chains are left-associative: `a[b].c` is `Property { object: Indexed { a, b }, c }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Expression {
    VariableAccess {
        name: String,
        position: Position,
    },
    IndexedAccess {
        object: Box<Expression>,
        index: Box<Expression>,
        position: Position,
    },
    PropertyAccess {
        object: Box<Expression>,
        property: String,
        position: Position,
    },
}

impl Expression {
    pub fn position(&self) -> Position {
        match self {
            Expression::VariableAccess { position, .. }
            | Expression::IndexedAccess { position, .. }
            | Expression::PropertyAccess { position, .. } => *position,
        }
    }

    /// Short name of the node kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::VariableAccess { .. } => "variable access",
            Expression::IndexedAccess { .. } => "indexed access",
            Expression::PropertyAccess { .. } => "property access",
        }
    }

    /// True for expressions that select into a collection (`a.b`, `a[b]`).
    pub fn is_member_access(&self) -> bool {
        matches!(
            self,
            Expression::IndexedAccess { .. } | Expression::PropertyAccess { .. }
        )
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::VariableAccess { name, .. } => f.write_str(name),
            Expression::IndexedAccess { object, index, .. } => write!(f, "{object}[{index}]"),
            Expression::PropertyAccess { object, property, .. } => write!(f, "{object}.{property}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    Equals,
}

/// Condition tested by an `IF` action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Condition {
    /// Holds when the target collection is non-empty (`HAS ITEMS`).
    CollectionCheck { target: Expression },
    Comparison {
        left: Expression,
        op: ComparisonOp,
        right: Expression,
    },
}

/// Output of a `MESSAGE` action: either literal text or an expression to interpolate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageContent {
    Template(String),
    Value(Expression),
}

/// One step of a script body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScriptAction {
    Message {
        content: MessageContent,
        position: Position,
    },
    If {
        condition: Condition,
        then_branch: Block,
        position: Position,
    },
    For {
        loop_var: String,
        collection: Expression,
        body: Block,
        position: Position,
    },
}
