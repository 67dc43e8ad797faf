//! The formula tree consumed by the proof checker.
//!
//! A formula is an immutable tree of [`Element`]s: leaves are [`Element::Atom`]
//! names and inner nodes are [`ElementList`]s carrying an [`Operator`] and an
//! ordered list of children. Equality is structural.
//!
//! Formulas can be deserialized from YAML: a scalar becomes an atom and a
//! single-key mapping `{OPERATOR: [children]}` becomes an operator
//! application.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::de::{self, MapAccess, SeqAccess, Visitor};

// ── Operator ────────────────────────────────────────────────────────

/// Operator tag of an [`ElementList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    /// Subject variable `VAR(name)`.
    Var,
    /// Predicate variable application `PREDVAR(name, args…)`.
    PredVar,
    /// Function variable application `FUNVAR(name, args…)`.
    FunVar,
    /// Predicate constant application `PREDCON(name, args…)`.
    PredCon,
    /// Function constant application `FUNCON(name, args…)`.
    FunCon,
    /// Negation.
    Not,
    /// Conjunction of two or more formulas.
    And,
    /// Disjunction of two or more formulas.
    Or,
    /// Implication `IMPL(antecedent, consequent)`.
    Impl,
    /// Equivalence of two formulas.
    Equi,
    /// Universal quantifier.
    Forall,
    /// Existential quantifier.
    Exists,
    /// Unique existential quantifier.
    ExistsUnique,
    /// Class term `CLASS(VAR(x), formula)`.
    Class,
}

impl Operator {
    /// All operators in declaration order.
    pub const ALL: [Self; 14] = [
        Self::Var,
        Self::PredVar,
        Self::FunVar,
        Self::PredCon,
        Self::FunCon,
        Self::Not,
        Self::And,
        Self::Or,
        Self::Impl,
        Self::Equi,
        Self::Forall,
        Self::Exists,
        Self::ExistsUnique,
        Self::Class,
    ];

    /// Returns the canonical upper-case tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Var => "VAR",
            Self::PredVar => "PREDVAR",
            Self::FunVar => "FUNVAR",
            Self::PredCon => "PREDCON",
            Self::FunCon => "FUNCON",
            Self::Not => "NOT",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Impl => "IMPL",
            Self::Equi => "EQUI",
            Self::Forall => "FORALL",
            Self::Exists => "EXISTS",
            Self::ExistsUnique => "EXISTSU",
            Self::Class => "CLASS",
        }
    }

    /// Returns `true` for operators whose first child is a bound subject
    /// variable.
    #[must_use]
    pub const fn is_binder(self) -> bool {
        matches!(
            self,
            Self::Forall | Self::Exists | Self::ExistsUnique | Self::Class
        )
    }

    /// Returns `true` for operators applied to a name followed by term
    /// arguments.
    #[must_use]
    pub const fn is_application(self) -> bool {
        matches!(
            self,
            Self::PredVar | Self::FunVar | Self::PredCon | Self::FunCon
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown operator tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operator '{0}'")]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownOperator(s.to_owned()))
    }
}

// ── Element ─────────────────────────────────────────────────────────

/// A node of a formula tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    /// A named leaf.
    Atom(String),
    /// An operator application.
    List(ElementList),
}

/// An operator applied to an ordered list of children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementList {
    operator: Operator,
    elements: Vec<Element>,
}

impl ElementList {
    /// Creates a new operator application.
    #[must_use]
    pub const fn new(operator: Operator, elements: Vec<Element>) -> Self {
        Self { operator, elements }
    }

    /// Returns the operator tag.
    #[must_use]
    pub const fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns the children in order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Returns the child at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// Returns the number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the list has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// For applications, returns the name atom.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self.elements.first() {
            Some(Element::Atom(name)) if self.operator.is_application() => Some(name),
            _ => None,
        }
    }

    /// For applications, returns the argument terms after the name.
    #[must_use]
    pub fn arguments(&self) -> &[Element] {
        if self.operator.is_application() {
            self.elements.get(1..).unwrap_or_default()
        } else {
            &[]
        }
    }
}

impl Element {
    /// Creates an atom.
    #[must_use]
    pub fn atom(name: impl Into<String>) -> Self {
        Self::Atom(name.into())
    }

    /// Creates an operator application.
    #[must_use]
    pub const fn list(operator: Operator, elements: Vec<Self>) -> Self {
        Self::List(ElementList::new(operator, elements))
    }

    /// `VAR(name)`.
    #[must_use]
    pub fn subject_variable(name: impl Into<String>) -> Self {
        Self::list(Operator::Var, vec![Self::atom(name)])
    }

    /// `PREDVAR(name, args…)`.
    #[must_use]
    pub fn predicate_variable(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::application(Operator::PredVar, name, args)
    }

    /// `FUNVAR(name, args…)`.
    #[must_use]
    pub fn function_variable(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::application(Operator::FunVar, name, args)
    }

    /// `PREDCON(name, args…)`.
    #[must_use]
    pub fn predicate_constant(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::application(Operator::PredCon, name, args)
    }

    /// `FUNCON(name, args…)`.
    #[must_use]
    pub fn function_constant(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::application(Operator::FunCon, name, args)
    }

    fn application(operator: Operator, name: impl Into<String>, args: Vec<Self>) -> Self {
        let mut elements = Vec::with_capacity(args.len() + 1);
        elements.push(Self::atom(name));
        elements.extend(args);
        Self::list(operator, elements)
    }

    /// `NOT(formula)`.
    #[must_use]
    pub fn not(formula: Self) -> Self {
        Self::list(Operator::Not, vec![formula])
    }

    /// `AND(formulas…)`.
    #[must_use]
    pub const fn and(formulas: Vec<Self>) -> Self {
        Self::list(Operator::And, formulas)
    }

    /// `OR(formulas…)`.
    #[must_use]
    pub const fn or(formulas: Vec<Self>) -> Self {
        Self::list(Operator::Or, formulas)
    }

    /// `IMPL(antecedent, consequent)`.
    #[must_use]
    pub fn implication(antecedent: Self, consequent: Self) -> Self {
        Self::list(Operator::Impl, vec![antecedent, consequent])
    }

    /// `EQUI(left, right)`.
    #[must_use]
    pub fn equivalence(left: Self, right: Self) -> Self {
        Self::list(Operator::Equi, vec![left, right])
    }

    /// `FORALL(variable, body)`.
    #[must_use]
    pub fn forall(variable: Self, body: Self) -> Self {
        Self::list(Operator::Forall, vec![variable, body])
    }

    /// `EXISTS(variable, body)`.
    #[must_use]
    pub fn exists(variable: Self, body: Self) -> Self {
        Self::list(Operator::Exists, vec![variable, body])
    }

    /// Returns the list view when this is an operator application.
    #[must_use]
    pub const fn as_list(&self) -> Option<&ElementList> {
        match self {
            Self::List(list) => Some(list),
            Self::Atom(_) => None,
        }
    }

    /// Returns the atom name when this is a leaf.
    #[must_use]
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Self::Atom(name) => Some(name),
            Self::List(_) => None,
        }
    }

    /// Returns the operator tag when this is an operator application.
    #[must_use]
    pub fn operator(&self) -> Option<Operator> {
        self.as_list().map(ElementList::operator)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(name) => write!(f, "\"{name}\""),
            Self::List(list) => {
                write!(f, "{}(", list.operator)?;
                for (i, child) in list.elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
        }
    }
}

// ── Deserialization ─────────────────────────────────────────────────

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(ElementVisitor)
    }
}

/// Visitor turning YAML scalars into atoms and single-key mappings into
/// operator applications.
struct ElementVisitor;

impl<'de> Visitor<'de> for ElementVisitor {
    type Value = Element;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(
            "an atom name or a single-key mapping from an operator \
             to its list of children",
        )
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Element::atom(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Element::Atom(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Element::Atom(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Element::Atom(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Err(de::Error::custom("null is not a formula element"))
    }

    fn visit_seq<A>(self, _seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        Err(de::Error::custom(
            "a bare sequence is not a formula element; wrap it in an operator",
        ))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let Some(tag) = map.next_key::<String>()? else {
            return Err(de::Error::custom("operator mapping must not be empty"));
        };
        let operator = tag.parse::<Operator>().map_err(de::Error::custom)?;
        let children: Vec<Element> = map.next_value()?;
        if map.next_key::<String>()?.is_some() {
            return Err(de::Error::custom(format!(
                "operator mapping for {operator} must have exactly one key"
            )));
        }
        Ok(Element::list(operator, children))
    }
}
