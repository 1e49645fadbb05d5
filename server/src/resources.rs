//! Static directory of emergency support resources.
//!
//! Served as provided; the contents are maintained by hand, not fetched.

use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct Hotline {
    pub name: &'static str,
    pub phone: &'static str,
    pub description: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct HealthCenter {
    pub name: &'static str,
    pub address: &'static str,
    pub phone: &'static str,
    pub hours: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct OnlineResource {
    pub name: &'static str,
    pub instructions: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct Directory {
    pub crisis_lines: Vec<Hotline>,
    pub centers: Vec<HealthCenter>,
    pub online: Vec<OnlineResource>,
}

pub fn directory() -> Directory {
    Directory {
        crisis_lines: vec![
            Hotline {
                name: "National Suicide Prevention Lifeline",
                phone: "988",
                description: "24/7 emotional support",
            },
            Hotline {
                name: "Emergency Services",
                phone: "911",
                description: "For immediate medical crises",
            },
            Hotline {
                name: "Crisis Line",
                phone: "1-800-273-8255",
                description: "Mental health crisis support",
            },
        ],
        centers: vec![
            HealthCenter {
                name: "North Mental Health Center",
                address: "123 Main Street",
                phone: "(555) 123-4567",
                hours: "Mon-Fri: 8:00 AM - 6:00 PM",
            },
            HealthCenter {
                name: "General Hospital - Psychiatry",
                address: "456 Health Avenue",
                phone: "(555) 987-6543",
                hours: "24 hours",
            },
            HealthCenter {
                name: "Mental Wellness Clinic",
                address: "789 Central Plaza",
                phone: "(555) 456-7890",
                hours: "Mon-Sat: 9:00 AM - 5:00 PM",
            },
        ],
        online: vec![
            OnlineResource {
                name: "Crisis Text Line",
                instructions: "Text HELLO to 741741",
            },
            OnlineResource {
                name: "SAMHSA National Helpline",
                instructions: "1-800-662-4357 (24/7)",
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_lists_the_crisis_line_first() {
        let dir = directory();
        assert_eq!(dir.crisis_lines[0].phone, "988");
        assert_eq!(dir.centers.len(), 3);
        assert_eq!(dir.online.len(), 2);
    }
}
