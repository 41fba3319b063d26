// Library root: the draft-state engine and the pieces it leans on (name
// parsing, snake order preview, turn timer, notices, export).

pub mod draft;
pub mod export;
pub mod names;
pub mod notice;
pub mod snake;
pub mod timer;
