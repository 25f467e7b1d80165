use chrono::{DateTime, Utc};

pub trait Clock {
    fn now() -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now() -> DateTime<Utc> {
        #[cfg(miri)]
        {
            DateTime::<Utc>::UNIX_EPOCH
        }
        #[cfg(not(miri))]
        {
            Utc::now()
        }
    }
}

pub fn now_utc() -> DateTime<Utc> {
    SystemClock::now()
}
