use indexmap::IndexMap;

/// Definition of a single model property.
#[derive(Debug, Clone)]
pub struct Property {
    /// Logical type
    pub ty: PropertyType,

    /// Position within the identifier when the property is (part of) the id
    pub id: Option<usize>,

    /// Storage-specific overrides
    pub storage: StorageOptions,
}

#[derive(Debug, Clone, Default)]
pub struct StorageOptions {
    /// Custom storage field name. Defaults to the property name.
    pub field_name: Option<String>,

    /// Storage data-type marker, e.g. `ObjectID` or `Decimal128`. Matched
    /// case-insensitively.
    pub data_type: Option<String>,
}

/// Logical property type.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyType {
    Scalar(ScalarType),

    /// The database's native reference identifier
    ObjectId,

    /// Inline nested schema
    Object(Embedded),

    Array(Box<PropertyType>),

    /// Nested model, by name
    Model(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    String,
    Number,
    Boolean,
    Date,
    Buffer,
    GeoPoint,
    Any,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Embedded {
    pub properties: IndexMap<String, Property>,
}

const OBJECT_ID_MARKER: &str = "objectid";
const DECIMAL128_MARKER: &str = "decimal128";

impl Property {
    pub fn new(ty: impl Into<PropertyType>) -> Self {
        Self {
            ty: ty.into(),
            id: None,
            storage: StorageOptions::default(),
        }
    }

    /// Marks the property as the model identifier.
    pub fn id(self) -> Self {
        self.id_at(0)
    }

    /// Marks the property as part of a composite identifier.
    pub fn id_at(mut self, position: usize) -> Self {
        self.id = Some(position);
        self
    }

    pub fn field_name(mut self, name: impl Into<String>) -> Self {
        self.storage.field_name = Some(name.into());
        self
    }

    pub fn data_type(mut self, data_type: impl Into<String>) -> Self {
        self.storage.data_type = Some(data_type.into());
        self
    }

    /// Returns `true` if the storage data-type marker names `marker`, either
    /// directly or in its array-element form (`[marker]`).
    pub fn has_data_type(&self, marker: &str) -> bool {
        let Some(data_type) = self.storage.data_type.as_deref() else {
            return false;
        };

        let data_type = data_type.trim();
        let element = data_type
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(data_type);

        element.trim().eq_ignore_ascii_case(marker)
    }

    /// True when values of this property must be stored as `ObjectId`,
    /// either through the data-type marker or the declared type.
    pub fn is_stored_as_object_id(&self) -> bool {
        if self.storage.data_type.is_some() {
            return self.has_data_type(OBJECT_ID_MARKER);
        }

        match &self.ty {
            PropertyType::ObjectId => true,
            PropertyType::Array(item) => **item == PropertyType::ObjectId,
            _ => false,
        }
    }

    pub fn is_decimal128(&self) -> bool {
        self.has_data_type(DECIMAL128_MARKER)
    }

    pub fn is_nested(&self) -> bool {
        self.ty.is_object_shaped()
    }
}

impl PropertyType {
    pub fn array(item: impl Into<PropertyType>) -> Self {
        Self::Array(Box::new(item.into()))
    }

    pub fn model(name: impl Into<String>) -> Self {
        Self::Model(name.into())
    }

    /// Object-shaped types carry a nested schema: inline objects, nested
    /// models and arrays of either.
    pub fn is_object_shaped(&self) -> bool {
        match self {
            Self::Object(_) | Self::Model(_) => true,
            Self::Array(item) => item.is_object_shaped(),
            _ => false,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }
}

impl Embedded {
    pub fn new<K, P>(properties: impl IntoIterator<Item = (K, P)>) -> Self
    where
        K: Into<String>,
        P: Into<Property>,
    {
        Self {
            properties: properties
                .into_iter()
                .map(|(name, property)| (name.into(), property.into()))
                .collect(),
        }
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
            && self.id == other.id
            && self.storage.field_name == other.storage.field_name
            && self.storage.data_type == other.storage.data_type
    }
}

impl From<ScalarType> for PropertyType {
    fn from(ty: ScalarType) -> Self {
        Self::Scalar(ty)
    }
}

impl From<Embedded> for PropertyType {
    fn from(embedded: Embedded) -> Self {
        Self::Object(embedded)
    }
}

impl From<PropertyType> for Property {
    fn from(ty: PropertyType) -> Self {
        Property::new(ty)
    }
}

impl From<ScalarType> for Property {
    fn from(ty: ScalarType) -> Self {
        Property::new(ty)
    }
}

impl From<Embedded> for Property {
    fn from(embedded: Embedded) -> Self {
        Property::new(embedded)
    }
}
