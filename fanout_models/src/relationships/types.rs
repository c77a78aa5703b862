#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RelationshipType {
    Follow,
}

impl From<RelationshipType> for i16 {
    fn from(value: RelationshipType) -> i16 {
        match value {
            RelationshipType::Follow => 1,
        }
    }
}
