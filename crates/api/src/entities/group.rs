use db::models::Group;
use serde::Serialize;

#[derive(Clone, Serialize, Debug)]
pub struct GroupView {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl GroupView {
    pub fn new(group: Group) -> Self {
        Self {
            id: group.id.to_string(),
            title: group.title,
            slug: group.slug,
            description: group.description,
        }
    }
}
