//! Type tags for the call boundary
//!
//! The set is closed: eight primitive kinds, two reference kinds and `void`.
//! Adding a kind means extending these enums, not registering anything.

/// Basic type of one signature position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BasicType {
    Boolean,
    Char,
    Short,
    Byte,
    Int,
    Long,
    Float,
    Double,
    Object,
    Array,
    Void,
}

impl BasicType {
    /// Primitive kind for this tag, `None` for references and `void`
    #[inline]
    pub const fn primitive(self) -> Option<PrimitiveKind> {
        match self {
            Self::Boolean => Some(PrimitiveKind::Boolean),
            Self::Char => Some(PrimitiveKind::Char),
            Self::Short => Some(PrimitiveKind::Short),
            Self::Byte => Some(PrimitiveKind::Byte),
            Self::Int => Some(PrimitiveKind::Int),
            Self::Long => Some(PrimitiveKind::Long),
            Self::Float => Some(PrimitiveKind::Float),
            Self::Double => Some(PrimitiveKind::Double),
            Self::Object | Self::Array | Self::Void => None,
        }
    }

    #[inline]
    pub const fn is_reference(self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }

    /// Descriptor character for this tag
    pub const fn descriptor_char(self) -> char {
        match self {
            Self::Boolean => 'Z',
            Self::Char => 'C',
            Self::Short => 'S',
            Self::Byte => 'B',
            Self::Int => 'I',
            Self::Long => 'J',
            Self::Float => 'F',
            Self::Double => 'D',
            Self::Object => 'L',
            Self::Array => '[',
            Self::Void => 'V',
        }
    }

    pub const fn name(self) -> &'static str {
        match self.primitive() {
            Some(kind) => kind.name(),
            None => match self {
                Self::Object => "object",
                Self::Array => "array",
                _ => "void",
            },
        }
    }
}

/// Primitive kinds that travel boxed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PrimitiveKind {
    Boolean,
    Char,
    Short,
    Byte,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    pub const COUNT: usize = 8;

    pub const ALL: [PrimitiveKind; Self::COUNT] = [
        Self::Boolean,
        Self::Char,
        Self::Short,
        Self::Byte,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Payload size in bytes inside the boxed wrapper
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            Self::Boolean | Self::Byte => 1,
            Self::Char | Self::Short => 2,
            Self::Int | Self::Float => 4,
            Self::Long | Self::Double => 8,
        }
    }

    /// Native slot the value widens into
    #[inline]
    pub const fn slot_kind(self) -> SlotKind {
        match self {
            Self::Boolean | Self::Char | Self::Short | Self::Byte | Self::Int => SlotKind::Int,
            Self::Long => SlotKind::Long,
            Self::Float => SlotKind::Float,
            Self::Double => SlotKind::Double,
        }
    }

    #[inline]
    pub const fn basic_type(self) -> BasicType {
        match self {
            Self::Boolean => BasicType::Boolean,
            Self::Char => BasicType::Char,
            Self::Short => BasicType::Short,
            Self::Byte => BasicType::Byte,
            Self::Int => BasicType::Int,
            Self::Long => BasicType::Long,
            Self::Float => BasicType::Float,
            Self::Double => BasicType::Double,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Char => "char",
            Self::Short => "short",
            Self::Byte => "byte",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

/// Kind of one native call-argument slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SlotKind {
    Int,
    Long,
    Float,
    Double,
    Object,
}

impl SlotKind {
    /// Call-stack words taken by the slot
    #[inline]
    pub const fn words(self) -> usize {
        match self {
            Self::Long | Self::Double => 2,
            Self::Int | Self::Float | Self::Object => 1,
        }
    }
}

/// Primitive payload as read out of a boxed wrapper
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveValue {
    Boolean(bool),
    Char(u16),
    Short(i16),
    Byte(i8),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl PrimitiveValue {
    #[inline]
    pub const fn kind(self) -> PrimitiveKind {
        match self {
            Self::Boolean(_) => PrimitiveKind::Boolean,
            Self::Char(_) => PrimitiveKind::Char,
            Self::Short(_) => PrimitiveKind::Short,
            Self::Byte(_) => PrimitiveKind::Byte,
            Self::Int(_) => PrimitiveKind::Int,
            Self::Long(_) => PrimitiveKind::Long,
            Self::Float(_) => PrimitiveKind::Float,
            Self::Double(_) => PrimitiveKind::Double,
        }
    }

    /// Decode a payload from native-endian bytes.
    ///
    /// `bytes` must hold exactly `kind.size()` bytes.
    pub fn from_ne_bytes(kind: PrimitiveKind, bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), kind.size());
        let mut buf = [0u8; 8];
        buf[..bytes.len()].copy_from_slice(bytes);
        match kind {
            PrimitiveKind::Boolean => Self::Boolean(buf[0] != 0),
            PrimitiveKind::Char => Self::Char(u16::from_ne_bytes([buf[0], buf[1]])),
            PrimitiveKind::Short => Self::Short(i16::from_ne_bytes([buf[0], buf[1]])),
            PrimitiveKind::Byte => Self::Byte(buf[0] as i8),
            PrimitiveKind::Int => Self::Int(i32::from_ne_bytes([buf[0], buf[1], buf[2], buf[3]])),
            PrimitiveKind::Float => {
                Self::Float(f32::from_ne_bytes([buf[0], buf[1], buf[2], buf[3]]))
            }
            PrimitiveKind::Long => Self::Long(i64::from_ne_bytes(buf)),
            PrimitiveKind::Double => Self::Double(f64::from_ne_bytes(buf)),
        }
    }

    /// Encode the payload as native-endian bytes (first `kind().size()` are used)
    pub fn to_ne_bytes(self) -> ([u8; 8], usize) {
        let mut buf = [0u8; 8];
        match self {
            Self::Boolean(v) => buf[0] = v as u8,
            Self::Char(v) => buf[..2].copy_from_slice(&v.to_ne_bytes()),
            Self::Short(v) => buf[..2].copy_from_slice(&v.to_ne_bytes()),
            Self::Byte(v) => buf[0] = v as u8,
            Self::Int(v) => buf[..4].copy_from_slice(&v.to_ne_bytes()),
            Self::Float(v) => buf[..4].copy_from_slice(&v.to_ne_bytes()),
            Self::Long(v) => buf = v.to_ne_bytes(),
            Self::Double(v) => buf = v.to_ne_bytes(),
        }
        (buf, self.kind().size())
    }
}

macro_rules! primitive_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for PrimitiveValue {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

primitive_value_from! {
    bool => Boolean,
    u16 => Char,
    i16 => Short,
    i8 => Byte,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
}
