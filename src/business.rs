//! Business profile of the deployment.
//!
//! A closed enum over the supported vertical markets, replacing free-form
//! configuration blobs. Every accessor is an exhaustive match, so adding
//! a vertical forces every call site to account for it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// The vertical a deployment is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BusinessKind {
    BarberShop,
    Massage,
    #[serde(rename = "hair")]
    #[default]
    HairSalon,
    Spa,
    MakeupArtists,
    Beauty,
    Bridal,
    Tattoo,
    PetGrooming,
    NailSalon,
    AestheticSkinCare,
    SalonBoothRental,
}

impl BusinessKind {
    /// All supported kinds, in display order.
    pub const ALL: [BusinessKind; 12] = [
        Self::BarberShop,
        Self::Massage,
        Self::HairSalon,
        Self::Spa,
        Self::MakeupArtists,
        Self::Beauty,
        Self::Bridal,
        Self::Tattoo,
        Self::PetGrooming,
        Self::NailSalon,
        Self::AestheticSkinCare,
        Self::SalonBoothRental,
    ];

    /// Snake_case identifier used in config files and URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BarberShop => "barber_shop",
            Self::Massage => "massage",
            Self::HairSalon => "hair",
            Self::Spa => "spa",
            Self::MakeupArtists => "makeup_artists",
            Self::Beauty => "beauty",
            Self::Bridal => "bridal",
            Self::Tattoo => "tattoo",
            Self::PetGrooming => "pet_grooming",
            Self::NailSalon => "nail_salon",
            Self::AestheticSkinCare => "aesthetic_skin_care",
            Self::SalonBoothRental => "salon_booth_rental",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::BarberShop => "Barber Shop",
            Self::Massage => "Massage",
            Self::HairSalon => "Hair Salon",
            Self::Spa => "Spa",
            Self::MakeupArtists => "Make Up Artists",
            Self::Beauty => "Beauty",
            Self::Bridal => "Bridal",
            Self::Tattoo => "Tattoo",
            Self::PetGrooming => "Pet Grooming",
            Self::NailSalon => "Nail Salon",
            Self::AestheticSkinCare => "Aesthetic Skin Care",
            Self::SalonBoothRental => "Salon Booth Rental",
        }
    }

    pub fn software_name(&self) -> &'static str {
        match self {
            Self::BarberShop => "Barbershop Software",
            Self::Massage => "Massage Therapy Software",
            Self::HairSalon => "Hair Salons Software",
            Self::Spa => "Spa Software",
            Self::MakeupArtists => "Makeup Artist Software",
            Self::Beauty => "Beauty Salon Software",
            Self::Bridal => "Bridal Salon Software",
            Self::Tattoo => "Tattoo Artist Software",
            Self::PetGrooming => "Pet Grooming Software",
            Self::NailSalon => "Nail Salon Software",
            Self::AestheticSkinCare => "Aesthetic skin clinic Software",
            Self::SalonBoothRental => "Salon Booth Renter Software",
        }
    }

    /// How the industry refers to itself ("barbershop", "massage therapy").
    pub fn industry_term(&self) -> &'static str {
        match self {
            Self::BarberShop => "barbershop",
            Self::Massage => "massage therapy",
            Self::HairSalon => "hair salon",
            Self::Spa => "spa",
            Self::MakeupArtists => "makeup artist",
            Self::Beauty => "beauty salon",
            Self::Bridal => "bridal salon",
            Self::Tattoo => "tattoo studio",
            Self::PetGrooming => "pet grooming",
            Self::NailSalon => "nail salon",
            Self::AestheticSkinCare => "aesthetic skin care",
            Self::SalonBoothRental => "salon booth rental",
        }
    }

    /// Singular noun for one business of this kind.
    pub fn business_term(&self) -> &'static str {
        match self {
            Self::BarberShop => "barbershop",
            Self::Massage => "massage therapy business",
            Self::HairSalon => "hair salon",
            Self::Spa => "spa",
            Self::MakeupArtists => "makeup artist business",
            Self::Beauty => "beauty salon",
            Self::Bridal => "bridal salon",
            Self::Tattoo => "tattoo studio",
            Self::PetGrooming => "pet grooming business",
            Self::NailSalon => "nail salon",
            Self::AestheticSkinCare => "aesthetic skin care business",
            Self::SalonBoothRental => "salon booth rental business",
        }
    }

    pub fn plural_term(&self) -> &'static str {
        match self {
            Self::BarberShop => "barbershops",
            Self::Massage => "massage therapy businesses",
            Self::HairSalon => "hair salons",
            Self::Spa => "spas",
            Self::MakeupArtists => "makeup artists",
            Self::Beauty => "beauty salons",
            Self::Bridal => "bridal salons",
            Self::Tattoo => "tattoo studios",
            Self::PetGrooming => "pet grooming businesses",
            Self::NailSalon => "nail salons",
            Self::AestheticSkinCare => "aesthetic skin care businesses",
            Self::SalonBoothRental => "salon booth rental businesses",
        }
    }
}

impl fmt::Display for BusinessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for BusinessKind {
    type Err = ScheduleError;

    /// Parse a snake_case id. Kebab-case inputs (from URLs) are
    /// normalized; anything else fails.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| {
                ScheduleError::InvalidRecord(format!("unknown business kind: {}", s))
            })
    }
}
