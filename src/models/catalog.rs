use chrono::{DateTime, NaiveDate, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use validator::Validate;

use crate::dto::catalog_dto::{
    BranchPayload, BrandPayload, JobPostingPayload, NewsPayload, PromotionPayload,
};
use crate::error::{Error, Result};
use crate::models::user::Role;
use crate::utils::validation::{ensure_email, ensure_phone, ensure_url, RequiredFields};

/// Admin-managed public content with active/featured flags and soft delete.
pub trait CatalogEntity: Serialize + DeserializeOwned + Send + Sync + 'static {
    type Payload: Serialize + DeserializeOwned + Validate + Send + 'static;

    const COLLECTION: &'static str;
    const NOT_FOUND: &'static str;
    const EDITORS: &'static [Role];

    fn from_payload(payload: Self::Payload) -> Result<Self>;

    /// Checks that hold for the full record after create or merge.
    fn check(&self) -> Result<()>;

    fn fallback() -> Vec<Self> {
        Vec::new()
    }
}

fn default_true() -> bool {
    true
}

fn check_url(label: &str, value: &Option<String>) -> Result<()> {
    match value {
        Some(url) => ensure_url(label, url),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
    pub opening_hours: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub manager_name: Option<String>,
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub featured: bool,
}

impl CatalogEntity for Branch {
    type Payload = BranchPayload;

    const COLLECTION: &'static str = "branches";
    const NOT_FOUND: &'static str = "Sucursal no encontrada";
    const EDITORS: &'static [Role] = &[Role::Admin];

    fn from_payload(p: BranchPayload) -> Result<Self> {
        RequiredFields::new()
            .check("nombre", &p.name)
            .check("dirección", &p.address)
            .check("ciudad", &p.city)
            .check("teléfono", &p.phone)
            .finish()?;
        let branch = Self {
            name: p.name.unwrap_or_default(),
            address: p.address.unwrap_or_default(),
            city: p.city.unwrap_or_default(),
            state: p.state,
            postal_code: p.postal_code,
            phone: p.phone.unwrap_or_default(),
            email: p.email,
            whatsapp: p.whatsapp,
            opening_hours: p.opening_hours,
            latitude: p.latitude,
            longitude: p.longitude,
            manager_name: p.manager_name,
            image_url: p.image_url,
            active: p.active.unwrap_or(true),
            featured: p.featured.unwrap_or(false),
        };
        branch.check()?;
        Ok(branch)
    }

    fn check(&self) -> Result<()> {
        ensure_phone(&self.phone)?;
        if let Some(whatsapp) = &self.whatsapp {
            ensure_phone(whatsapp)?;
        }
        if let Some(email) = &self.email {
            ensure_email(email)?;
        }
        check_url("imagen", &self.image_url)
    }

    fn fallback() -> Vec<Self> {
        vec![
            Self {
                name: "Sucursal Centro".into(),
                address: "Av. Juárez 120, Col. Centro".into(),
                city: "Guadalajara".into(),
                state: Some("Jalisco".into()),
                postal_code: Some("44100".into()),
                phone: "33 3614 0000".into(),
                email: None,
                whatsapp: None,
                opening_hours: Some("Lun a Sáb 8:00 - 19:00".into()),
                latitude: Some(20.6736),
                longitude: Some(-103.3440),
                manager_name: None,
                image_url: None,
                active: true,
                featured: true,
            },
            Self {
                name: "Sucursal Zapopan".into(),
                address: "Av. Patria 1500".into(),
                city: "Zapopan".into(),
                state: Some("Jalisco".into()),
                postal_code: Some("45110".into()),
                phone: "33 3629 0000".into(),
                email: None,
                whatsapp: None,
                opening_hours: Some("Lun a Dom 8:00 - 20:00".into()),
                latitude: Some(20.7099),
                longitude: Some(-103.4104),
                manager_name: None,
                image_url: None,
                active: true,
                featured: false,
            },
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub category: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub featured: bool,
}

impl CatalogEntity for Brand {
    type Payload = BrandPayload;

    const COLLECTION: &'static str = "brands";
    const NOT_FOUND: &'static str = "Marca no encontrada";
    const EDITORS: &'static [Role] = &[Role::Admin];

    fn from_payload(p: BrandPayload) -> Result<Self> {
        RequiredFields::new().check("nombre", &p.name).finish()?;
        let brand = Self {
            name: p.name.unwrap_or_default(),
            description: p.description,
            logo_url: p.logo_url,
            website: p.website,
            category: p.category,
            active: p.active.unwrap_or(true),
            featured: p.featured.unwrap_or(false),
        };
        brand.check()?;
        Ok(brand)
    }

    fn check(&self) -> Result<()> {
        check_url("logo", &self.logo_url)?;
        check_url("sitio web", &self.website)
    }

    fn fallback() -> Vec<Self> {
        ["Truper", "Pretul", "Comex", "Urrea"]
            .into_iter()
            .map(|name| Self {
                name: name.to_string(),
                description: None,
                logo_url: None,
                website: None,
                category: None,
                active: true,
                featured: true,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct News {
    pub title: String,
    pub summary: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub published_at: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub featured: bool,
}

impl CatalogEntity for News {
    type Payload = NewsPayload;

    const COLLECTION: &'static str = "news";
    const NOT_FOUND: &'static str = "Noticia no encontrada";
    const EDITORS: &'static [Role] = &[Role::Admin, Role::Manager];

    fn from_payload(p: NewsPayload) -> Result<Self> {
        RequiredFields::new()
            .check("título", &p.title)
            .check("contenido", &p.content)
            .finish()?;
        let news = Self {
            title: p.title.unwrap_or_default(),
            summary: p.summary,
            content: p.content.unwrap_or_default(),
            image_url: p.image_url,
            author: p.author,
            category: p.category,
            published_at: p.published_at.unwrap_or_else(Utc::now),
            active: p.active.unwrap_or(true),
            featured: p.featured.unwrap_or(false),
        };
        news.check()?;
        Ok(news)
    }

    fn check(&self) -> Result<()> {
        check_url("imagen", &self.image_url)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub discount: Option<String>,
    pub terms: Option<String>,
    #[serde(default)]
    pub branch_ids: Vec<String>,
    pub starts_at: Option<NaiveDate>,
    pub ends_at: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub featured: bool,
}

impl CatalogEntity for Promotion {
    type Payload = PromotionPayload;

    const COLLECTION: &'static str = "promotions";
    const NOT_FOUND: &'static str = "Promoción no encontrada";
    const EDITORS: &'static [Role] = &[Role::Admin, Role::Manager];

    fn from_payload(p: PromotionPayload) -> Result<Self> {
        RequiredFields::new()
            .check("título", &p.title)
            .check("descripción", &p.description)
            .finish()?;
        let promotion = Self {
            title: p.title.unwrap_or_default(),
            description: p.description.unwrap_or_default(),
            image_url: p.image_url,
            discount: p.discount,
            terms: p.terms,
            branch_ids: p.branch_ids.unwrap_or_default(),
            starts_at: p.starts_at,
            ends_at: p.ends_at,
            active: p.active.unwrap_or(true),
            featured: p.featured.unwrap_or(false),
        };
        promotion.check()?;
        Ok(promotion)
    }

    fn check(&self) -> Result<()> {
        if let (Some(starts), Some(ends)) = (self.starts_at, self.ends_at) {
            if ends < starts {
                return Err(Error::BadRequest(
                    "La fecha de fin no puede ser anterior a la de inicio".into(),
                ));
            }
        }
        check_url("imagen", &self.image_url)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub department: Option<String>,
    pub branch_id: Option<String>,
    pub location: String,
    pub employment_type: Option<String>,
    pub description: String,
    pub requirements: Option<String>,
    pub salary_range: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub featured: bool,
}

impl CatalogEntity for JobPosting {
    type Payload = JobPostingPayload;

    const COLLECTION: &'static str = "jobs";
    const NOT_FOUND: &'static str = "Vacante no encontrada";
    const EDITORS: &'static [Role] = &[Role::Admin, Role::Hr];

    fn from_payload(p: JobPostingPayload) -> Result<Self> {
        RequiredFields::new()
            .check("puesto", &p.title)
            .check("ubicación", &p.location)
            .check("descripción", &p.description)
            .finish()?;
        Ok(Self {
            title: p.title.unwrap_or_default(),
            department: p.department,
            branch_id: p.branch_id,
            location: p.location.unwrap_or_default(),
            employment_type: p.employment_type,
            description: p.description.unwrap_or_default(),
            requirements: p.requirements,
            salary_range: p.salary_range,
            active: p.active.unwrap_or(true),
            featured: p.featured.unwrap_or(false),
        })
    }

    fn check(&self) -> Result<()> {
        Ok(())
    }
}
