// ── Wire → domain conversions ──

use phonebook_api::{ContactDto, UserDto};

use crate::model::{Contact, ContactId, User};

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        Self {
            name: dto.name,
            email: dto.email,
        }
    }
}

impl From<ContactDto> for Contact {
    fn from(dto: ContactDto) -> Self {
        Self {
            id: ContactId::from(dto.id),
            name: dto.name,
            number: dto.number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_dto_maps_fields() {
        let contact = Contact::from(ContactDto {
            id: "c1".into(),
            name: "Rosie Simpson".into(),
            number: "459-12-56".into(),
        });
        assert_eq!(contact.id.as_str(), "c1");
        assert_eq!(contact.name, "Rosie Simpson");
        assert_eq!(contact.number, "459-12-56");
    }

    #[test]
    fn user_dto_maps_fields() {
        let user = User::from(UserDto {
            name: "A".into(),
            email: "a@b.com".into(),
        });
        assert_eq!(user, User { name: "A".into(), email: "a@b.com".into() });
    }
}
