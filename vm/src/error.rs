use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("virtual page {0:#04X} is outside the 64-page address space")]
    PageOutOfRange(usize),

    #[error("page offset {0:#04X} does not fit in a page")]
    OffsetOutOfRange(usize),

    /// Loading a page found every frame occupied. Eviction always runs
    /// first when RAM is full, so this means the frame bookkeeping is off.
    #[error("no free frame to load page {0:#04X} into")]
    NoFreeFrame(usize),

    /// A step needed the frame of the in-flight page before it was resolved.
    #[error("page {0:#04X} has no resolved frame")]
    Unresolved(usize),

    #[error("page replacer could not pick a victim frame")]
    NoVictim,
}
