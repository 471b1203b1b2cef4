/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryComparisonOperator {
    /// Equal (`$eq`, `==`)
    Eq,
    /// Not equal (`$ne`, `!=`)
    Neq,
    /// Less than (`$lt`, `<`)
    Lt,
    /// Greater than (`$gt`, `>`)
    Gt,
    /// Less than or equal (`$lte`, `<=`)
    Lte,
    /// Greater than or equal (`$gte`, `>=`)
    Gte,
}

impl BinaryComparisonOperator {
    /// The operator that gives the same answer with operands swapped.
    pub fn invert(self) -> Self {
        use BinaryComparisonOperator::*;
        match self {
            Eq => Eq,
            Neq => Neq,
            Lt => Gt,
            Gt => Lt,
            Lte => Gte,
            Gte => Lte,
        }
    }

    pub fn is_equality(self) -> bool {
        matches!(self, BinaryComparisonOperator::Eq | BinaryComparisonOperator::Neq)
    }

    /// Native query operator.
    pub fn mongo_operator(self) -> &'static str {
        use BinaryComparisonOperator::*;
        match self {
            Eq => "$eq",
            Neq => "$ne",
            Lt => "$lt",
            Gt => "$gt",
            Lte => "$lte",
            Gte => "$gte",
        }
    }

    /// Scripting-language symbol.
    pub fn script_symbol(self) -> &'static str {
        use BinaryComparisonOperator::*;
        match self {
            Eq => "==",
            Neq => "!=",
            Lt => "<",
            Gt => ">",
            Lte => "<=",
            Gte => ">=",
        }
    }
}

/// `and` / `or` over a list of queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaryLogicalOperator {
    And,
    Or,
}

impl NaryLogicalOperator {
    pub fn mongo_operator(self) -> &'static str {
        match self {
            NaryLogicalOperator::And => "$and",
            NaryLogicalOperator::Or => "$or",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryLogicalOperator {
    Not,
}

impl UnaryLogicalOperator {
    /// `$not` only wraps an operator expression, so negating a whole query
    /// uses the list form `$nor`.
    pub fn mongo_operator(self) -> &'static str {
        match self {
            UnaryLogicalOperator::Not => "$nor",
        }
    }
}

/// Membership operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaryRelationalOperator {
    In,
    NotIn,
}

impl NaryRelationalOperator {
    pub fn mongo_operator(self) -> &'static str {
        match self {
            NaryRelationalOperator::In => "$in",
            NaryRelationalOperator::NotIn => "$nin",
        }
    }
}

/// Array containment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainsOperator {
    All,
    Any,
    None,
}

/// Operators of a set-style update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateOperator {
    /// Replace the field value (`$set`)
    Set,
    /// Add to the field value (`$inc`)
    Add,
}

impl UpdateOperator {
    pub fn mongo_operator(self) -> &'static str {
        match self {
            UpdateOperator::Set => "$set",
            UpdateOperator::Add => "$inc",
        }
    }
}
