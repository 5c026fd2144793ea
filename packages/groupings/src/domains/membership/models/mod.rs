pub mod results;

pub use results::{
    AddMemberResult, GroupingView, GroupingsServiceResult, Membership, RemoveMemberResult,
    ResultCode,
};
