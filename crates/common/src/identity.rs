use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Joins the components of a composite identity.
pub const SEPARATOR: char = '/';

/// Join `parts` in order into one opaque identity string.
///
/// Components must be non-empty and must not contain [`SEPARATOR`];
/// parts are never escaped, so such values are rejected instead.
pub fn encode(parts: &[&str]) -> Result<String, Error> {
    if parts.is_empty() {
        return Err(Error::MalformedIdentity(
            "an identity needs at least one component".to_string(),
        ));
    }
    for part in parts {
        check_component(part)?;
    }
    Ok(parts.join(&SEPARATOR.to_string()))
}

/// Split an identity produced by [`encode`] back into exactly `arity` parts.
pub fn decode(identity: &str, arity: usize) -> Result<Vec<String>, Error> {
    let separators = identity.matches(SEPARATOR).count();
    if arity == 0 || separators != arity - 1 {
        return Err(Error::MalformedIdentity(format!(
            "expected {} components in '{}', found {}",
            arity,
            identity,
            separators + 1
        )));
    }
    let parts: Vec<String> = identity.split(SEPARATOR).map(str::to_string).collect();
    if parts.iter().any(String::is_empty) {
        return Err(Error::MalformedIdentity(format!(
            "empty component in '{}'",
            identity
        )));
    }
    Ok(parts)
}

fn check_component(part: &str) -> Result<(), Error> {
    if part.is_empty() {
        return Err(Error::MalformedIdentity(
            "identity components cannot be empty".to_string(),
        ));
    }
    if part.contains(SEPARATOR) {
        return Err(Error::MalformedIdentity(format!(
            "component '{}' contains the separator '{}'",
            part, SEPARATOR
        )));
    }
    Ok(())
}

/// A fixed-shape identity made of an ordered tuple of components.
pub trait CompositeId: Sized {
    const ARITY: usize;

    /// Components in declared order: bucket id, access key id, alias.
    fn parts(&self) -> Vec<&str>;

    fn from_parts(parts: Vec<String>) -> Result<Self, Error>;

    fn encode(&self) -> Result<String, Error> {
        encode(&self.parts())
    }

    fn decode(identity: &str) -> Result<Self, Error> {
        Self::from_parts(decode(identity, Self::ARITY)?)
    }
}

fn take_parts<const N: usize>(parts: Vec<String>) -> Result<[String; N], Error> {
    let found = parts.len();
    parts.try_into().map_err(|_| {
        Error::MalformedIdentity(format!("expected {} components, found {}", N, found))
    })
}

macro_rules! composite_id {
    ($(#[$meta:meta])* $name:ident { $($field:ident),+ $(,)? }, $arity:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name {
            $(pub $field: String,)+
        }

        impl $name {
            /// Build the identity, rejecting components the codec cannot carry.
            pub fn new($($field: impl Into<String>),+) -> Result<Self, Error> {
                let id = Self { $($field: $field.into(),)+ };
                for part in id.parts() {
                    check_component(part)?;
                }
                Ok(id)
            }
        }

        impl CompositeId for $name {
            const ARITY: usize = $arity;

            fn parts(&self) -> Vec<&str> {
                vec![$(self.$field.as_str(),)+]
            }

            fn from_parts(parts: Vec<String>) -> Result<Self, Error> {
                let [$($field,)+] = take_parts::<$arity>(parts)?;
                Self::new($($field,)+)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                // components are validated on construction
                write!(f, "{}", self.parts().join(&SEPARATOR.to_string()))
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as CompositeId>::decode(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = Error;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.to_string()
            }
        }
    };
}

composite_id!(
    /// Identity of a bucket/key permission grant.
    GrantId { bucket_id, access_key_id },
    2
);

composite_id!(
    /// Identity of a cluster-wide bucket alias.
    GlobalAliasId { bucket_id, alias },
    2
);

composite_id!(
    /// Identity of an alias scoped to one access key.
    LocalAliasId {
        bucket_id,
        access_key_id,
        alias
    },
    3
);

/// Shape-tagged identity for callers that handle relationship resources
/// generically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Pair(String, String),
    Triple(String, String, String),
}

impl Identity {
    pub fn arity(&self) -> usize {
        match self {
            Identity::Pair(..) => 2,
            Identity::Triple(..) => 3,
        }
    }

    pub fn encode(&self) -> Result<String, Error> {
        match self {
            Identity::Pair(a, b) => encode(&[a.as_str(), b.as_str()]),
            Identity::Triple(a, b, c) => encode(&[a.as_str(), b.as_str(), c.as_str()]),
        }
    }

    pub fn decode(identity: &str, arity: usize) -> Result<Self, Error> {
        let parts = decode(identity, arity)?;
        match arity {
            2 => {
                let [a, b] = take_parts::<2>(parts)?;
                Ok(Identity::Pair(a, b))
            }
            3 => {
                let [a, b, c] = take_parts::<3>(parts)?;
                Ok(Identity::Triple(a, b, c))
            }
            n => Err(Error::MalformedIdentity(format!(
                "no identity shape with {} components",
                n
            ))),
        }
    }
}

impl From<GrantId> for Identity {
    fn from(id: GrantId) -> Self {
        Identity::Pair(id.bucket_id, id.access_key_id)
    }
}

impl From<GlobalAliasId> for Identity {
    fn from(id: GlobalAliasId) -> Self {
        Identity::Pair(id.bucket_id, id.alias)
    }
}

impl From<LocalAliasId> for Identity {
    fn from(id: LocalAliasId) -> Self {
        Identity::Triple(id.bucket_id, id.access_key_id, id.alias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_joins_in_order() {
        assert_eq!(encode(&["b1", "GK1", "web"]).unwrap(), "b1/GK1/web");
    }

    #[test]
    fn test_round_trip() {
        let cases: &[&[&str]] = &[
            &["b1"],
            &["b1", "GK1"],
            &["b1", "GK1", "public-site"],
            &["e3b0c442", "alias.with.dots"],
        ];
        for parts in cases {
            let identity = encode(parts).unwrap();
            let decoded = decode(&identity, parts.len()).unwrap();
            assert_eq!(decoded, parts.iter().map(|p| p.to_string()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_decode_wrong_arity() {
        assert!(matches!(
            decode("b1/GK1/web", 2),
            Err(Error::MalformedIdentity(_))
        ));
        assert!(matches!(decode("b1", 2), Err(Error::MalformedIdentity(_))));
        assert!(matches!(decode("b1", 0), Err(Error::MalformedIdentity(_))));
    }

    #[test]
    fn test_decode_empty_component() {
        assert!(matches!(decode("/GK1", 2), Err(Error::MalformedIdentity(_))));
        assert!(matches!(decode("b1/", 2), Err(Error::MalformedIdentity(_))));
    }

    #[test]
    fn test_encode_rejects_separator_in_component() {
        assert!(matches!(
            encode(&["b1", "a/b"]),
            Err(Error::MalformedIdentity(_))
        ));
        assert!(matches!(encode(&["b1", ""]), Err(Error::MalformedIdentity(_))));
        assert!(matches!(encode(&[]), Err(Error::MalformedIdentity(_))));
    }

    #[test]
    fn test_typed_identities() {
        let grant = GrantId::new("b1", "GK1").unwrap();
        assert_eq!(grant.to_string(), "b1/GK1");
        assert_eq!("b1/GK1".parse::<GrantId>().unwrap(), grant);

        let local: LocalAliasId = "b1/GK1/site".parse().unwrap();
        assert_eq!(local.bucket_id, "b1");
        assert_eq!(local.access_key_id, "GK1");
        assert_eq!(local.alias, "site");
        assert_eq!(CompositeId::encode(&local).unwrap(), "b1/GK1/site");

        assert!("b1/GK1".parse::<LocalAliasId>().is_err());
        assert!(GlobalAliasId::new("b1", "a/b").is_err());
    }

    #[test]
    fn test_serde_goes_through_validation() {
        let grant = GrantId::new("b1", "GK1").unwrap();
        assert_eq!(serde_json::to_string(&grant).unwrap(), "\"b1/GK1\"");
        let parsed: GrantId = serde_json::from_str("\"b1/GK1\"").unwrap();
        assert_eq!(parsed, grant);

        assert!(serde_json::from_str::<GrantId>("\"b1/GK1/web\"").is_err());
        assert!(serde_json::from_str::<GlobalAliasId>("\"b1/\"").is_err());
        assert!(serde_json::from_str::<LocalAliasId>("\"/GK1/web\"").is_err());
    }

    #[test]
    fn test_tagged_identity() {
        let id = Identity::from(GlobalAliasId::new("b1", "public").unwrap());
        assert_eq!(id.arity(), 2);
        let encoded = id.encode().unwrap();
        assert_eq!(Identity::decode(&encoded, 2).unwrap(), id);

        let id = Identity::Triple("b1".into(), "GK1".into(), "x".into());
        assert_eq!(Identity::decode("b1/GK1/x", 3).unwrap(), id);
        assert!(Identity::decode("a/b/c/d", 4).is_err());
    }
}
