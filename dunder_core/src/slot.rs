use std::fmt::{self, Display};

/// Binary operators that have a forward, a reflected and an in-place slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    MatMul,
    TrueDiv,
    FloorDiv,
    Mod,
    Pow,
    LShift,
    RShift,
    And,
    Or,
    Xor,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 13] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::MatMul,
        BinaryOp::TrueDiv,
        BinaryOp::FloorDiv,
        BinaryOp::Mod,
        BinaryOp::Pow,
        BinaryOp::LShift,
        BinaryOp::RShift,
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::Xor,
    ];

    /// The dunder stem, `add` for `__add__`.
    pub fn stem(&self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::MatMul => "matmul",
            BinaryOp::TrueDiv => "truediv",
            BinaryOp::FloorDiv => "floordiv",
            BinaryOp::Mod => "mod",
            BinaryOp::Pow => "pow",
            BinaryOp::LShift => "lshift",
            BinaryOp::RShift => "rshift",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
        }
    }

    /// The source-level operator symbol, `+` for `Add`.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::MatMul => "@",
            BinaryOp::TrueDiv => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::LShift => "<<",
            BinaryOp::RShift => ">>",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Rich comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompareOp {
    Lt,
    Le,
    Eq,
    Ne,
    Gt,
    Ge,
}

impl CompareOp {
    pub const ALL: [CompareOp; 6] = [
        CompareOp::Lt,
        CompareOp::Le,
        CompareOp::Eq,
        CompareOp::Ne,
        CompareOp::Gt,
        CompareOp::Ge,
    ];

    /// The operator tried on the right operand when the left one declines.
    ///
    /// `a < b` reflects to `b > a`, equality reflects onto itself.
    pub fn swapped(&self) -> Self {
        match self {
            CompareOp::Lt => CompareOp::Gt,
            CompareOp::Le => CompareOp::Ge,
            CompareOp::Eq => CompareOp::Eq,
            CompareOp::Ne => CompareOp::Ne,
            CompareOp::Gt => CompareOp::Lt,
            CompareOp::Ge => CompareOp::Le,
        }
    }

    pub fn stem(&self) -> &'static str {
        match self {
            CompareOp::Lt => "lt",
            CompareOp::Le => "le",
            CompareOp::Eq => "eq",
            CompareOp::Ne => "ne",
            CompareOp::Gt => "gt",
            CompareOp::Ge => "ge",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    /// Apply this operator to an already computed ordering.
    pub fn test(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;

        match self {
            CompareOp::Lt => ordering == Less,
            CompareOp::Le => ordering != Greater,
            CompareOp::Eq => ordering == Equal,
            CompareOp::Ne => ordering != Equal,
            CompareOp::Gt => ordering == Greater,
            CompareOp::Ge => ordering != Less,
        }
    }
}

impl Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnaryOp {
    Neg,
    Pos,
    Abs,
    Invert,
}

impl UnaryOp {
    pub fn stem(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Pos => "pos",
            UnaryOp::Abs => "abs",
            UnaryOp::Invert => "invert",
        }
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Neg => f.write_str("unary -"),
            UnaryOp::Pos => f.write_str("unary +"),
            UnaryOp::Abs => f.write_str("abs()"),
            UnaryOp::Invert => f.write_str("unary ~"),
        }
    }
}

/// The closed catalogue of slots a type may fill in its capability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SlotKind {
    // containers
    Length,
    GetItem,
    SetItem,
    DelItem,
    Contains,
    Iterate,
    Reverse,

    // operators
    Binary(BinaryOp),
    Reflected(BinaryOp),
    InPlace(BinaryOp),
    Compare(CompareOp),
    Unary(UnaryOp),

    // conversions
    Hash,
    Bool,
    Repr,

    // attributes
    GetAttr,
    SetAttr,
    DelAttr,
    DescriptorGet,
    DescriptorSet,
    DescriptorDelete,

    Call,

    // scoped resources
    Enter,
    Exit,
}

impl SlotKind {
    /// Slots that a present handler may decline with `NotApplicable`.
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            SlotKind::Binary(_)
                | SlotKind::Reflected(_)
                | SlotKind::InPlace(_)
                | SlotKind::Compare(_)
                | SlotKind::Unary(_)
        )
    }
}

impl Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Length => write!(f, "__len__"),
            SlotKind::GetItem => write!(f, "__getitem__"),
            SlotKind::SetItem => write!(f, "__setitem__"),
            SlotKind::DelItem => write!(f, "__delitem__"),
            SlotKind::Contains => write!(f, "__contains__"),
            SlotKind::Iterate => write!(f, "__iter__"),
            SlotKind::Reverse => write!(f, "__reversed__"),
            SlotKind::Binary(op) => write!(f, "__{}__", op.stem()),
            SlotKind::Reflected(op) => write!(f, "__r{}__", op.stem()),
            SlotKind::InPlace(op) => write!(f, "__i{}__", op.stem()),
            SlotKind::Compare(op) => write!(f, "__{}__", op.stem()),
            SlotKind::Unary(op) => write!(f, "__{}__", op.stem()),
            SlotKind::Hash => write!(f, "__hash__"),
            SlotKind::Bool => write!(f, "__bool__"),
            SlotKind::Repr => write!(f, "__repr__"),
            SlotKind::GetAttr => write!(f, "__getattr__"),
            SlotKind::SetAttr => write!(f, "__setattr__"),
            SlotKind::DelAttr => write!(f, "__delattr__"),
            SlotKind::DescriptorGet => write!(f, "__get__"),
            SlotKind::DescriptorSet => write!(f, "__set__"),
            SlotKind::DescriptorDelete => write!(f, "__delete__"),
            SlotKind::Call => write!(f, "__call__"),
            SlotKind::Enter => write!(f, "__enter__"),
            SlotKind::Exit => write!(f, "__exit__"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dunder_names() {
        assert_eq!(SlotKind::Binary(BinaryOp::Add).to_string(), "__add__");
        assert_eq!(SlotKind::Reflected(BinaryOp::Mul).to_string(), "__rmul__");
        assert_eq!(SlotKind::InPlace(BinaryOp::FloorDiv).to_string(), "__ifloordiv__");
        assert_eq!(SlotKind::Compare(CompareOp::Le).to_string(), "__le__");
        assert_eq!(SlotKind::DescriptorGet.to_string(), "__get__");
    }

    #[test]
    fn swapped_comparisons_round_trip() {
        for op in CompareOp::ALL {
            assert_eq!(op.swapped().swapped(), op);
        }

        assert_eq!(CompareOp::Lt.swapped(), CompareOp::Gt);
    }
}
