pub mod staff_id;

pub use staff_id::StaffId;
