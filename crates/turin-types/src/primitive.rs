use std::fmt;

use fxhash::FxHashMap;
use lazy_static::lazy_static;

use crate::JvmType;

/// The primitive types of the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTypeUsage {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

pub const ALL: [PrimitiveTypeUsage; 8] = [
    PrimitiveTypeUsage::Boolean,
    PrimitiveTypeUsage::Char,
    PrimitiveTypeUsage::Byte,
    PrimitiveTypeUsage::Short,
    PrimitiveTypeUsage::Int,
    PrimitiveTypeUsage::Long,
    PrimitiveTypeUsage::Float,
    PrimitiveTypeUsage::Double,
];

lazy_static! {
    static ref BY_NAME: FxHashMap<&'static str, PrimitiveTypeUsage> =
        ALL.iter().map(|p| (p.name(), *p)).collect();
}

impl PrimitiveTypeUsage {
    pub fn by_name(name: &str) -> Option<Self> {
        BY_NAME.get(name).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveTypeUsage::Boolean => "boolean",
            PrimitiveTypeUsage::Char => "char",
            PrimitiveTypeUsage::Byte => "byte",
            PrimitiveTypeUsage::Short => "short",
            PrimitiveTypeUsage::Int => "int",
            PrimitiveTypeUsage::Long => "long",
            PrimitiveTypeUsage::Float => "float",
            PrimitiveTypeUsage::Double => "double",
        }
    }

    pub fn jvm_type(&self) -> JvmType {
        JvmType::new(match self {
            PrimitiveTypeUsage::Boolean => "Z",
            PrimitiveTypeUsage::Char => "C",
            PrimitiveTypeUsage::Byte => "B",
            PrimitiveTypeUsage::Short => "S",
            PrimitiveTypeUsage::Int => "I",
            PrimitiveTypeUsage::Long => "J",
            PrimitiveTypeUsage::Float => "F",
            PrimitiveTypeUsage::Double => "D",
        })
    }

    pub fn is_numeric(&self) -> bool {
        self.rank().is_some()
    }

    pub fn is_boolean(&self) -> bool {
        *self == PrimitiveTypeUsage::Boolean
    }

    /// Position in the numeric widening order, `None` for non numeric types.
    fn rank(&self) -> Option<u8> {
        match self {
            PrimitiveTypeUsage::Byte => Some(0),
            PrimitiveTypeUsage::Short => Some(1),
            PrimitiveTypeUsage::Int => Some(2),
            PrimitiveTypeUsage::Long => Some(3),
            PrimitiveTypeUsage::Float => Some(4),
            PrimitiveTypeUsage::Double => Some(5),
            PrimitiveTypeUsage::Boolean | PrimitiveTypeUsage::Char => None,
        }
    }

    /// The wider of two numeric types, `None` if either is not numeric.
    pub fn promote(self, other: Self) -> Option<Self> {
        let (a, b) = (self.rank()?, other.rank()?);
        Some(if a >= b { self } else { other })
    }

    /// Identity or a widening primitive conversion.
    pub fn can_widen_to(&self, target: &Self) -> bool {
        if self == target {
            return true;
        }
        match (self, target.rank()) {
            // char widens to int and beyond
            (PrimitiveTypeUsage::Char, Some(rank)) => rank >= 2,
            (_, Some(rank)) => self.rank().map_or(false, |own| own < rank),
            (_, None) => false,
        }
    }
}

impl fmt::Display for PrimitiveTypeUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name() {
        for primitive in ALL {
            assert_eq!(PrimitiveTypeUsage::by_name(primitive.name()), Some(primitive));
        }
        assert_eq!(PrimitiveTypeUsage::by_name("string"), None);
    }

    #[test]
    fn test_promotion() {
        use PrimitiveTypeUsage::*;
        assert_eq!(Int.promote(Double), Some(Double));
        assert_eq!(Long.promote(Int), Some(Long));
        assert_eq!(Int.promote(Int), Some(Int));
        assert_eq!(Int.promote(Boolean), None);
        assert_eq!(Char.promote(Int), None);
    }

    #[test]
    fn test_widening() {
        use PrimitiveTypeUsage::*;
        assert!(Int.can_widen_to(&Long));
        assert!(Int.can_widen_to(&Double));
        assert!(Char.can_widen_to(&Int));
        assert!(!Char.can_widen_to(&Short));
        assert!(!Double.can_widen_to(&Int));
        assert!(!Boolean.can_widen_to(&Int));
        assert!(!Int.can_widen_to(&Boolean));
        assert!(Boolean.can_widen_to(&Boolean));
    }
}
