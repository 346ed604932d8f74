mod condolence;
mod donation;
mod funeral;

pub use condolence::{Condolence, NewCondolence};
pub use donation::{
    Donation, DonationStats, DonationStatus, NewDonation, DEFAULT_CURRENCY,
};
pub use funeral::{
    DateRange, Funeral, FuneralFilter, FuneralStatus, NewFuneral, SortField, Timeframe,
};
