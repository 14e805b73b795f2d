mod api_group_list;

pub use api_group_list::{ApiGroupList, ApiGroupListItem, ApiGroupVersion};
