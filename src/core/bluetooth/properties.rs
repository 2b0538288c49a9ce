//! Capability flag description for discovered characteristics

use crate::core::bluetooth::types::CharacteristicFlags;

/// Builds a human-readable summary of the enabled capability flags.
///
/// Flags are visited in their declaration order, enabled names are
/// upper-cased and joined with `", "`. Returns an empty string when no
/// flag is set.
pub fn describe_properties(flags: &CharacteristicFlags) -> String {
    let mut supported = Vec::new();
    for (name, enabled) in flags.entries() {
        if enabled {
            supported.push(name.to_uppercase());
        }
    }
    supported.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_and_notify_only() {
        let flags = CharacteristicFlags {
            read: true,
            notify: true,
            ..Default::default()
        };
        assert_eq!(describe_properties(&flags), "READ, NOTIFY");
    }

    #[test]
    fn no_flags_set_yields_empty_string() {
        assert_eq!(describe_properties(&CharacteristicFlags::default()), "");
    }

    #[test]
    fn all_flags_follow_declaration_order() {
        let flags = CharacteristicFlags {
            broadcast: true,
            read: true,
            write_without_response: true,
            write: true,
            notify: true,
            indicate: true,
            authenticated_signed_writes: true,
            extended_properties: true,
        };
        assert_eq!(
            describe_properties(&flags),
            "BROADCAST, READ, WRITE_WITHOUT_RESPONSE, WRITE, NOTIFY, INDICATE, \
             AUTHENTICATED_SIGNED_WRITES, EXTENDED_PROPERTIES"
        );
    }

    #[test]
    fn write_only() {
        let flags = CharacteristicFlags {
            write: true,
            ..Default::default()
        };
        assert_eq!(describe_properties(&flags), "WRITE");
    }
}
