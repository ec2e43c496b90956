use std::fmt::Display;

use thiserror::Error;

/// The closed algebra of static types. `ArgList` only ever appears as the
/// synthesized type of a call's expression list; `Unresolved` records a type
/// name the parser could not map to a primitive; `Error` is the sentinel an
/// operation failure leaves on the offending node.
#[derive(Debug, Clone, PartialEq)]
pub enum StaticType {
    Int,
    Float,
    Bool,
    Void,
    Array { elem: Box<StaticType>, dim: u32 },
    Function { ret: Box<StaticType>, params: Vec<StaticType> },
    ArgList(Vec<StaticType>),
    Unresolved(String),
    Error(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypeMismatch {
    #[error("Cannot {op} {lhs} and {rhs}.")]
    Arithmetic {
        op: &'static str,
        lhs: StaticType,
        rhs: StaticType,
    },
    #[error("Logical {op} requires bool operands, got {lhs} and {rhs}.")]
    Logical {
        op: &'static str,
        lhs: StaticType,
        rhs: StaticType,
    },
    #[error("Logical not requires a bool operand, got {operand}.")]
    Negation { operand: StaticType },
    #[error("Cannot compare {lhs} with {rhs}.")]
    Comparison { lhs: StaticType, rhs: StaticType },
    #[error("Cannot index {target} with {index}.")]
    Index { target: StaticType, index: StaticType },
    #[error("Call to {name} does not match its declared parameters.")]
    Call { name: String },
    #[error("Cannot assign {src} to {target}.")]
    Assignment { target: StaticType, src: StaticType },
    #[error("Function {name} cannot return {value}.")]
    Return { name: String, value: StaticType },
    #[error("Function main must take no parameters and return void.")]
    Entrance,
    #[error("Declaration {name} cannot have type {ty}.")]
    Declaration { name: String, ty: StaticType },
}

impl StaticType {
    /// A function type used as a value stands for its return type;
    /// everything else stands for itself.
    pub fn value(&self) -> &StaticType {
        match self {
            StaticType::Function { ret, .. } => ret,
            other => other,
        }
    }

    /// The scalar kind with function and array layers stripped.
    pub fn base(&self) -> &StaticType {
        let mut ty = self.value();
        while let StaticType::Array { elem, .. } = ty {
            ty = elem;
        }
        ty
    }

    fn is_numeric(&self) -> bool {
        matches!(self, StaticType::Int | StaticType::Float)
    }

    fn arithmetic(&self, that: &StaticType, op: &'static str) -> Result<StaticType, TypeMismatch> {
        let (lhs, rhs) = (self.value(), that.value());
        if lhs == rhs && lhs.is_numeric() {
            Ok(lhs.clone())
        } else {
            Err(TypeMismatch::Arithmetic {
                op,
                lhs: lhs.clone(),
                rhs: rhs.clone(),
            })
        }
    }

    pub fn add(&self, that: &StaticType) -> Result<StaticType, TypeMismatch> {
        self.arithmetic(that, "add")
    }

    pub fn sub(&self, that: &StaticType) -> Result<StaticType, TypeMismatch> {
        self.arithmetic(that, "subtract")
    }

    pub fn mul(&self, that: &StaticType) -> Result<StaticType, TypeMismatch> {
        self.arithmetic(that, "multiply")
    }

    pub fn div(&self, that: &StaticType) -> Result<StaticType, TypeMismatch> {
        self.arithmetic(that, "divide")
    }

    fn logical(&self, that: &StaticType, op: &'static str) -> Result<StaticType, TypeMismatch> {
        let (lhs, rhs) = (self.value(), that.value());
        if lhs == &StaticType::Bool && rhs == &StaticType::Bool {
            Ok(StaticType::Bool)
        } else {
            Err(TypeMismatch::Logical {
                op,
                lhs: lhs.clone(),
                rhs: rhs.clone(),
            })
        }
    }

    pub fn and(&self, that: &StaticType) -> Result<StaticType, TypeMismatch> {
        self.logical(that, "and")
    }

    pub fn or(&self, that: &StaticType) -> Result<StaticType, TypeMismatch> {
        self.logical(that, "or")
    }

    pub fn not(&self) -> Result<StaticType, TypeMismatch> {
        if self.value() == &StaticType::Bool {
            Ok(StaticType::Bool)
        } else {
            Err(TypeMismatch::Negation {
                operand: self.value().clone(),
            })
        }
    }

    /// Ordering and equality between two operands of the same numeric
    /// primitive. The result is always `Bool`.
    pub fn compare(&self, that: &StaticType) -> Result<StaticType, TypeMismatch> {
        let (lhs, rhs) = (self.value(), that.value());
        if lhs == rhs && lhs.is_numeric() {
            Ok(StaticType::Bool)
        } else {
            Err(TypeMismatch::Comparison {
                lhs: lhs.clone(),
                rhs: rhs.clone(),
            })
        }
    }

    /// Unwraps "address of" to "value of"; the identity on anything already
    /// resolved to a value.
    pub fn deref(&self) -> StaticType {
        self.value().clone()
    }

    pub fn index(&self, idx: &StaticType) -> Result<StaticType, TypeMismatch> {
        match (self.value(), idx.value()) {
            (StaticType::Array { elem, .. }, StaticType::Int) => Ok((**elem).clone()),
            _ => Err(TypeMismatch::Index {
                target: self.value().clone(),
                index: idx.value().clone(),
            }),
        }
    }

    /// Call compatibility: `self` must be a function, `args` an argument
    /// list of the same length, and each parameter's base type must match
    /// the corresponding argument's base type pairwise. Array nesting and
    /// dimensions do not participate.
    pub fn call(&self, args: &StaticType, name: &str) -> Result<StaticType, TypeMismatch> {
        let mismatch = || TypeMismatch::Call {
            name: name.to_string(),
        };
        let (params, ret) = match self {
            StaticType::Function { ret, params } => (params, ret),
            _ => return Err(mismatch()),
        };
        let args = match args {
            StaticType::ArgList(args) => args,
            _ => return Err(mismatch()),
        };
        if params.len() != args.len() {
            return Err(mismatch());
        }
        for (param, arg) in params.iter().zip(args) {
            if param.base() != arg.base() {
                return Err(mismatch());
            }
        }
        Ok((**ret).clone())
    }

    /// Checks a returned value against this (function) type's declared
    /// return type, comparing base types.
    pub fn ret(&self, value: &StaticType, name: &str) -> Result<StaticType, TypeMismatch> {
        let declared: &StaticType = match self {
            StaticType::Function { ret, .. } => ret,
            other => other,
        };
        if declared.base() == value.base() {
            Ok(value.clone())
        } else {
            Err(TypeMismatch::Return {
                name: name.to_string(),
                value: value.value().clone(),
            })
        }
    }

    pub fn assign(&self, source: &StaticType) -> Result<StaticType, TypeMismatch> {
        let (target, source_v) = (self.value(), source.value());
        if target == source_v && matches!(target, StaticType::Int | StaticType::Float | StaticType::Bool) {
            Ok(target.clone())
        } else {
            Err(TypeMismatch::Assignment {
                target: target.clone(),
                src: source_v.clone(),
            })
        }
    }

    /// The entry point must be a function taking no parameters and
    /// returning void.
    pub fn check_entrance(&self) -> Result<(), TypeMismatch> {
        match self {
            StaticType::Function { ret, params }
                if params.is_empty() && **ret == StaticType::Void =>
            {
                Ok(())
            }
            _ => Err(TypeMismatch::Entrance),
        }
    }

    /// Well-formedness of a declared type: no void variables, arrays or
    /// parameters, and no type name that failed to resolve.
    pub fn check_decl(&self, name: &str) -> Result<(), TypeMismatch> {
        let bad = || TypeMismatch::Declaration {
            name: name.to_string(),
            ty: self.clone(),
        };
        match self {
            StaticType::Function { ret, params } => {
                for param in params {
                    if !storable(param) {
                        return Err(bad());
                    }
                }
                if **ret != StaticType::Void && !storable(ret) {
                    return Err(bad());
                }
                Ok(())
            }
            other if storable(other) => Ok(()),
            _ => Err(bad()),
        }
    }
}

// A type a variable, array element or parameter can hold.
fn storable(ty: &StaticType) -> bool {
    match ty {
        StaticType::Int | StaticType::Float | StaticType::Bool => true,
        StaticType::Array { elem, .. } => storable(elem),
        _ => false,
    }
}

impl Display for StaticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StaticType::Int => write!(f, "int"),
            StaticType::Float => write!(f, "float"),
            StaticType::Bool => write!(f, "bool"),
            StaticType::Void => write!(f, "void"),
            StaticType::Array { .. } => {
                // Outermost syntactic dimension first: int[3][4].
                let mut ty = self;
                let mut dims = vec![];
                while let StaticType::Array { elem, dim } = ty {
                    dims.push(*dim);
                    ty = elem;
                }
                write!(f, "{}", ty)?;
                for dim in dims {
                    write!(f, "[{}]", dim)?;
                }
                Ok(())
            }
            StaticType::Function { ret, params } => {
                write!(f, "func(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, "): {}", ret)
            }
            StaticType::ArgList(args) => {
                write!(f, "(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            StaticType::Unresolved(name) => write!(f, "{}", name),
            StaticType::Error(_) => write!(f, "<error>"),
        }
    }
}
