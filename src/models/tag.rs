use crate::schema::tags;
use serde::Serialize;

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, Eq, PartialEq)]
#[diesel(table_name = tags)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}
