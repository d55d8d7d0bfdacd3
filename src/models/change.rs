use crate::schema::changes;
use chrono::NaiveDateTime;

#[derive(Queryable, Selectable, Identifiable, Insertable, Debug, Clone, Eq, PartialEq)]
#[diesel(table_name = changes)]
pub struct Change {
    pub id: i32,
    pub updated: NaiveDateTime,
}
