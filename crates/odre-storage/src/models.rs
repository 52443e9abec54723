use crate::schema::plans;

use diesel::prelude::*;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = plans)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PlanRow {
  pub date: String,
  pub document: String,
  pub updated_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = plans)]
pub struct NewPlanRow<'a> {
  pub date: &'a str,
  pub document: &'a str,
  pub updated_at: &'a str,
}
