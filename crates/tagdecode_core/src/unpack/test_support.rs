//! Expression family shared by unit tests.

use serde::{Deserialize, Serialize, Serializer};

use crate::unpack::{Polymorphic, Registry};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) enum Expr {
	BinaryExpr(BinaryExpr),
	UnaryExpr(UnaryExpr),
	ListExpr(ListExpr),
	Terminal(Terminal),
	#[serde(untagged)]
	Nested(Nested),
}

// Family members serialize as their bare struct so documents carry the `op` convention.
impl Serialize for Expr {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::BinaryExpr(item) => item.serialize(serializer),
			Self::UnaryExpr(item) => item.serialize(serializer),
			Self::ListExpr(item) => item.serialize(serializer),
			Self::Terminal(item) => item.serialize(serializer),
			Self::Nested(item) => item.serialize(serializer),
		}
	}
}

impl Default for Expr {
	fn default() -> Self {
		Self::Terminal(Terminal::default())
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct BinaryExpr {
	pub op: String,
	pub lhs: Box<Expr>,
	pub rhs: Box<Expr>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct UnaryExpr {
	pub op: String,
	pub operand: Box<Expr>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct ListExpr {
	pub op: String,
	pub exprs: Vec<Expr>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Terminal {
	pub op: String,
	pub body: String,
}

/// Untagged wrapper; not a registered family member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Nested {
	pub expr: Box<Expr>,
}

pub(crate) fn terminal(body: &str) -> Expr {
	Expr::Terminal(Terminal {
		op: "Terminal".to_owned(),
		body: body.to_owned(),
	})
}

pub(crate) fn unary(operand: Expr) -> Expr {
	Expr::UnaryExpr(UnaryExpr {
		op: "UnaryExpr".to_owned(),
		operand: Box::new(operand),
	})
}

pub(crate) fn binary(lhs: Expr, rhs: Expr) -> Expr {
	Expr::BinaryExpr(BinaryExpr {
		op: "BinaryExpr".to_owned(),
		lhs: Box::new(lhs),
		rhs: Box::new(rhs),
	})
}

pub(crate) fn list(exprs: Vec<Expr>) -> Expr {
	Expr::ListExpr(ListExpr {
		op: "ListExpr".to_owned(),
		exprs,
	})
}

pub(crate) fn expr_registry() -> Registry {
	Registry::builder()
		.register(&BinaryExpr::default(), &[Polymorphic::single("lhs"), Polymorphic::single("rhs")])
		.and_then(|builder| builder.register(&UnaryExpr::default(), &[Polymorphic::single("operand")]))
		.and_then(|builder| builder.register(&ListExpr::default(), &[Polymorphic::sequence("exprs")]))
		.and_then(|builder| builder.register(&Terminal::default(), &[]))
		.expect("expr family registers")
		.build()
}
