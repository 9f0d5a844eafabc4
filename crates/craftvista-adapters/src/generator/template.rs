//! Offline generator producing deterministic copy from the seller's input.

use async_trait::async_trait;
use craftvista_core::{
    application::{ContentGenerator, GenerationError, GenerationRequest, StoryRequest},
    domain::{Category, GeneratedContent},
};

/// Suggested price when nothing better is known, in rupees.
pub const DEFAULT_PRICE: f64 = 500.0;

/// Builds listing copy without any network call.
#[derive(Debug, Clone)]
pub struct TemplateGenerator {
    base_price: f64,
}

impl TemplateGenerator {
    pub fn new() -> Self {
        Self {
            base_price: DEFAULT_PRICE,
        }
    }

    pub fn with_base_price(mut self, price: f64) -> Self {
        self.base_price = price;
        self
    }

    fn compose(&self, request: &GenerationRequest) -> GeneratedContent {
        let title = format!("Handcrafted {}", request.category.display_name());

        let mut description = request.description.trim().to_string();
        if !request.materials.is_empty() {
            if !description.ends_with('.') {
                description.push('.');
            }
            description.push_str(&format!(" Made from {}.", request.materials.join(", ")));
        }

        let maker = request
            .artisan_name
            .as_deref()
            .unwrap_or("a traditional artisan");
        let cultural_context = format!(
            "{} Crafted by {maker} using techniques passed down through generations.",
            heritage(request.category)
        );

        let mut keywords = vec![
            request.category.as_str().to_string(),
            "handmade".to_string(),
            "traditional".to_string(),
        ];
        keywords.extend(request.materials.iter().map(|m| m.to_lowercase()));

        GeneratedContent::new(title, description, cultural_context, self.base_price)
            .with_keywords(keywords)
    }

    fn tell(&self, request: &StoryRequest) -> String {
        let maker = request
            .artisan_name
            .as_deref()
            .unwrap_or("A skilled artisan");
        let mut opening = format!("{maker} made this {} by hand", request.title.trim());
        if !request.materials.is_empty() {
            opening.push_str(&format!(" from {}", request.materials.join(", ")));
        }
        opening.push_str(". ");
        opening.push_str(heritage(request.category));

        format!(
            "{opening}\n\nThis beautiful piece of {} represents the timeless artistry of Indian \
             craftsmanship, created with love and traditional techniques passed down through \
             generations.",
            request.category.display_name().to_lowercase()
        )
    }
}

impl Default for TemplateGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentGenerator for TemplateGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedContent, GenerationError> {
        Ok(self.compose(request))
    }

    async fn generate_story(&self, request: &StoryRequest) -> Result<String, GenerationError> {
        Ok(self.tell(request))
    }
}

fn heritage(category: Category) -> &'static str {
    match category {
        Category::Pottery => "Indian potters have shaped river clay on the wheel for millennia.",
        Category::Textiles => "Hand-loomed and block-printed textiles are among India's oldest crafts.",
        Category::Jewelry => "Indian jewellery traditions tie adornment to ritual and celebration.",
        Category::Woodwork => "Carved wood furnishes Indian homes and temples alike.",
        Category::Metalwork => "Bell-metal and brass casting have thrived in Indian workshops for centuries.",
        Category::Paintings => "Folk painting styles carry the stories of their regions.",
        Category::Leather => "Leather craft in India joins utility with bold ornament.",
        Category::Stone => "Stone carving has shaped India's monuments and household shrines.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftvista_core::domain::DraftInput;

    fn request(materials: &[&str]) -> GenerationRequest {
        let input = DraftInput::new(Category::Pottery, "handmade bowl")
            .with_materials(materials.iter().copied());
        GenerationRequest::from_input(&input, Some("Meera".into()))
    }

    #[tokio::test]
    async fn copy_is_deterministic_and_valid() {
        let generator = TemplateGenerator::new();
        let first = generator.generate(&request(&["clay"])).await.unwrap();
        let second = generator.generate(&request(&["clay"])).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.title, "Handcrafted Pottery & Ceramics");
        assert_eq!(first.description, "handmade bowl. Made from clay.");
        assert!(first.cultural_context.contains("Meera"));
        assert_eq!(first.suggested_price, DEFAULT_PRICE);
        assert!(first.validate().is_ok());
    }

    #[tokio::test]
    async fn no_materials_leaves_description_alone() {
        let content = TemplateGenerator::new()
            .with_base_price(1200.0)
            .generate(&request(&[]))
            .await
            .unwrap();
        assert_eq!(content.description, "handmade bowl");
        assert_eq!(content.suggested_price, 1200.0);
        assert_eq!(content.keywords, vec!["pottery", "handmade", "traditional"]);
    }

    #[tokio::test]
    async fn story_names_maker_piece_and_materials() {
        let request = StoryRequest {
            title: "Blue Pottery Vase".into(),
            description: "Hand painted.".into(),
            category: Category::Pottery,
            materials: vec!["quartz".into(), "glass".into()],
            artisan_name: Some("Meera".into()),
        };
        let generator = TemplateGenerator::new();
        let story = generator.generate_story(&request).await.unwrap();

        assert!(story.starts_with("Meera made this Blue Pottery Vase by hand from quartz, glass."));
        assert!(story.contains("\n\n"));
        assert_eq!(story, generator.generate_story(&request).await.unwrap());

        let anonymous = StoryRequest {
            artisan_name: None,
            materials: Vec::new(),
            ..request
        };
        let story = generator.generate_story(&anonymous).await.unwrap();
        assert!(story.starts_with("A skilled artisan made this Blue Pottery Vase by hand."));
    }
}
