#[macro_export]
macro_rules! internal_error_message {
    () => {
        format!("Internal error at {}:{}.", file!(), line!())
    };
    ($($arg:tt)+) => {
        format!("Internal error at {}:{}: {}.", file!(), line!(), format!($($arg)*))
    };
}


// Why a user action was refused. None of these are fatal: the UI stays interactive and the
// session state is left as it was.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputError {
    NoGameInProgress,
    // A request to the server has not been answered yet.
    RequestPending,
    // Waiting for the user to pick a promotion piece.
    PromotionPending,
    NoPromotionPending,
    EmptySquare,
    // The square holds a piece of the opponent.
    NotPlayable,
    NoDragInProgress,
}
