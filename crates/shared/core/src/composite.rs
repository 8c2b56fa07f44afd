//! Composite flag namespaces spanning several independently declared fields.

use crate::bit::Bit;
use crate::error::FlagError;
use crate::handler::BitHandler;
use crate::registry::FlagRegistry;
use fxhash::FxHashMap;
use tracing::debug;

/// The declaration of a composite field: an ordered list of member field names whose flag
/// namespaces are known to be disjoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeField {
    name: String,
    members: Vec<String>,
}

impl CompositeField {
    /// Declares a composite over `(field name, registry)` members.
    ///
    /// Runs once per declaration, not per record.
    ///
    /// # Errors
    /// Returns [`FlagError::Validation`] if two members declare the same flag name or if no
    /// member is given.
    pub fn declare<'a, I>(name: impl Into<String>, members: I) -> Result<Self, FlagError>
    where
        I: IntoIterator<Item = (&'a str, &'a FlagRegistry)>,
    {
        let name = name.into();
        let mut owners: FxHashMap<&str, &str> = FxHashMap::default();
        let mut fields = Vec::new();

        for (field, registry) in members {
            for flag in registry.names().filter(|flag| !flag.is_empty()) {
                if let Some(previous) = owners.insert(flag, field) {
                    return Err(FlagError::Validation {
                        message: format!(
                            "flag `{flag}` is declared by both `{previous}` and `{field}`"
                        )
                        .into(),
                        context: Some(format!("composite `{name}`").into()),
                    });
                }
            }
            fields.push(field.to_owned());
        }

        if fields.is_empty() {
            return Err(FlagError::Validation {
                message: "a composite needs at least one member".into(),
                context: Some(format!("composite `{name}`").into()),
            });
        }

        debug!(composite = %name, members = fields.len(), flags = owners.len(), "Composite declared");
        Ok(Self { name, members: fields })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member field names in lookup order.
    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.members
    }
}

/// A read/write façade that forwards named flag access to the first member declaring it.
///
/// The view borrows the members; every write lands in the member handler immediately.
#[derive(Debug)]
pub struct CompositeView<'a> {
    members: Vec<&'a mut BitHandler>,
}

impl<'a> CompositeView<'a> {
    #[must_use]
    pub const fn new(members: Vec<&'a mut BitHandler>) -> Self {
        Self { members }
    }

    /// Returns whether any member declares `name`.
    #[must_use]
    pub fn has_flag(&self, name: &str) -> bool {
        self.members.iter().any(|member| member.registry().contains(name))
    }

    /// Reads a flag from the first member declaring it.
    ///
    /// # Errors
    /// Returns [`FlagError::Name`] if no member declares `name`.
    pub fn flag(&self, name: &str) -> Result<Bit, FlagError> {
        self.members
            .iter()
            .find(|member| member.registry().contains(name))
            .ok_or_else(|| FlagError::unknown_name(name))?
            .flag(name)
    }

    /// Writes a flag through to the first member declaring it.
    ///
    /// # Errors
    /// Returns [`FlagError::Name`] if no member declares `name`.
    pub fn set_flag(&mut self, name: &str, on: bool) -> Result<Bit, FlagError> {
        self.members
            .iter_mut()
            .find(|member| member.registry().contains(name))
            .ok_or_else(|| FlagError::unknown_name(name))?
            .set_flag(name, on)
    }

    /// Union of the member flag names, in member order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().flat_map(|member| member.keys().filter(|name| !name.is_empty()))
    }

    /// Number of member handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first() -> FlagRegistry {
        FlagRegistry::new(["FLAG_0", "FLAG_1", "FLAG_2", "FLAG_3"]).unwrap()
    }

    fn second() -> FlagRegistry {
        FlagRegistry::new(["FLAG_4", "FLAG_5", "FLAG_6", "FLAG_7"]).unwrap()
    }

    #[test]
    fn disjoint_members_validate() {
        let (a, b) = (first(), second());
        let field = CompositeField::declare("flags", [("flags_1", &a), ("flags_2", &b)]).unwrap();
        assert_eq!(field.members(), ["flags_1", "flags_2"]);
    }

    #[test]
    fn overlapping_members_fail() {
        let (a, b) = (first(), FlagRegistry::new(["FLAG_9", "FLAG_2"]).unwrap());
        let err = CompositeField::declare("flags", [("flags_1", &a), ("flags_2", &b)]).unwrap_err();
        assert!(matches!(err, FlagError::Validation { .. }));
        assert!(err.to_string().contains("FLAG_2"));
    }

    #[test]
    fn empty_composite_fails() {
        let none: [(&str, &FlagRegistry); 0] = [];
        assert!(CompositeField::declare("flags", none).is_err());
    }

    #[test]
    fn get_and_set_forward_to_members() {
        let mut flags_1 = BitHandler::new(1, first());
        let mut flags_2 = BitHandler::new(0, second());

        {
            let mut view = CompositeView::new(vec![&mut flags_1, &mut flags_2]);
            assert!(view.flag("FLAG_0").unwrap().is_set());
            assert!(!view.flag("FLAG_4").unwrap().is_set());
            assert!(matches!(view.flag("flag_NA"), Err(FlagError::Name { .. })));
            assert!(view.has_flag("FLAG_7"));
            assert!(!view.has_flag("flag_NA"));

            view.set_flag("FLAG_0", false).unwrap();
            view.set_flag("FLAG_4", true).unwrap();
            assert!(view.set_flag("flag_NA", false).is_err());
            assert_eq!(view.names().count(), 8);
        }

        assert_eq!(flags_1.value(), 0);
        assert_eq!(flags_2.value(), 1);
    }
}
