//! Member grid view model
//!
//! Projects member documents into the rows and columns of the admin grid.

use mb_core::member::Member;
use serde::Serialize;
use uuid::Uuid;

/// What a row's action button does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    /// Open the member detail view
    View(Uuid),
}

/// One row of the member grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberRow {
    /// 1-based position in the loaded list
    pub id: usize,
    /// Internal member id
    pub aid: Uuid,
    pub account: String,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub approved: bool,
    pub balance: i64,
    /// The member document the row was built from
    pub data: Member,
}

impl MemberRow {
    pub fn from_member(id: usize, member: Member) -> Self {
        Self {
            id,
            aid: member.id,
            account: member.account.clone(),
            name: member.name.clone(),
            email: member.email.clone(),
            mobile: member.mobile.clone(),
            approved: member.approved,
            balance: member.account_balance,
            data: member,
        }
    }

    pub fn view_action(&self) -> RowAction {
        RowAction::View(self.aid)
    }
}

/// Build grid rows, numbering them from 1 in list order
pub fn member_rows(members: Vec<Member>) -> Vec<MemberRow> {
    members
        .into_iter()
        .enumerate()
        .map(|(index, member)| MemberRow::from_member(index + 1, member))
        .collect()
}

/// Column layout for the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridColumn {
    pub field: &'static str,
    pub header_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex: Option<u32>,
}

pub const MEMBER_COLUMNS: [GridColumn; 6] = [
    GridColumn {
        field: "id",
        header_name: "ID",
        width: Some(10),
        min_width: None,
        flex: None,
    },
    GridColumn {
        field: "name",
        header_name: "Name",
        width: Some(200),
        min_width: None,
        flex: Some(1),
    },
    GridColumn {
        field: "email",
        header_name: "Email",
        width: Some(150),
        min_width: None,
        flex: Some(1),
    },
    GridColumn {
        field: "mobile",
        header_name: "Mobile",
        width: Some(150),
        min_width: None,
        flex: Some(1),
    },
    GridColumn {
        field: "balance",
        header_name: "Balance",
        width: Some(150),
        min_width: None,
        flex: Some(1),
    },
    GridColumn {
        field: "action",
        header_name: "Actions",
        width: None,
        min_width: Some(150),
        flex: Some(1),
    },
];
