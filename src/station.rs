use std::fmt;

use clap::ValueEnum;

/// A BBC radio station whose published playlist page can be mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Station {
    #[value(name = "radio-1")]
    Radio1,
    #[value(name = "radio-1-xtra")]
    Radio1Xtra,
    #[value(name = "radio-2")]
    Radio2,
    #[value(name = "radio-6")]
    Radio6,
    #[value(name = "bbc-asian-network")]
    AsianNetwork,
}

impl Station {
    pub fn key(&self) -> &'static str {
        match self {
            Station::Radio1 => "radio-1",
            Station::Radio1Xtra => "radio-1-xtra",
            Station::Radio2 => "radio-2",
            Station::Radio6 => "radio-6",
            Station::AsianNetwork => "bbc-asian-network",
        }
    }

    /// The fixed playlist article for this station.
    pub fn playlist_url(&self) -> &'static str {
        match self {
            Station::Radio1 => {
                "https://www.bbc.co.uk/programmes/articles/3tqPdBWF9yMbTrfjWvfKV8t/radio-1-playlist"
            }
            Station::Radio1Xtra => {
                "https://www.bbc.co.uk/programmes/articles/2sgpCPqVPgjqC7tHBb97kd9/the-1xtra-playlist"
            }
            Station::Radio2 => {
                "https://www.bbc.co.uk/programmes/articles/2qNJsnjYFvbLrK9CZ0CfYfM/radio-2-new-music-playlist"
            }
            Station::Radio6 => {
                "https://www.bbc.co.uk/programmes/articles/5JDPyPdDGs3yCLdtPhGgWM7/bbc-radio-6-music-playlist"
            }
            Station::AsianNetwork => {
                "https://www.bbc.co.uk/programmes/articles/z39bpDGcLXC9Sy64yz1Xgt/asian-network-playlist"
            }
        }
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
