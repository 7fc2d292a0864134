/// How the table widget renders a column's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Url,
    Currency,
    Text,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    SameTab,
    NewTab,
}

/// Per-column rendering hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeAttributes {
    /// Row field whose value is shown as the link label.
    pub label_field: Option<&'static str>,
    pub target: Option<LinkTarget>,
    pub tooltip: Option<&'static str>,
}

impl TypeAttributes {
    const NONE: TypeAttributes = TypeAttributes {
        label_field: None,
        target: None,
        tooltip: None,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub label: &'static str,
    pub field: &'static str,
    pub column_type: ColumnType,
    pub wrap_text: bool,
    pub type_attributes: TypeAttributes,
}

pub const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        label: "Opportunity Name",
        field: "link_url",
        column_type: ColumnType::Url,
        wrap_text: true,
        type_attributes: TypeAttributes {
            label_field: Some("name"),
            target: Some(LinkTarget::NewTab),
            tooltip: Some("Go to Opportunity page"),
        },
    },
    ColumnSpec {
        label: "Amount",
        field: "amount",
        column_type: ColumnType::Currency,
        wrap_text: false,
        type_attributes: TypeAttributes::NONE,
    },
    ColumnSpec {
        label: "Stage",
        field: "stage_name",
        column_type: ColumnType::Text,
        wrap_text: false,
        type_attributes: TypeAttributes::NONE,
    },
    ColumnSpec {
        label: "Close Date",
        field: "close_date",
        column_type: ColumnType::Date,
        wrap_text: false,
        type_attributes: TypeAttributes::NONE,
    },
    ColumnSpec {
        label: "Main Competitors",
        field: "main_competitors",
        column_type: ColumnType::Text,
        wrap_text: false,
        type_attributes: TypeAttributes::NONE,
    },
    ColumnSpec {
        label: "Probability",
        field: "probability_label",
        column_type: ColumnType::Text,
        wrap_text: false,
        type_attributes: TypeAttributes::NONE,
    },
];
