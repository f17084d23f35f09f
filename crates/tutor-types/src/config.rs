use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorConfig {
    pub generation: GenerationConfig,
    pub storage: StorageConfig,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub api_key: String,
    pub api_base: Option<String>,
    pub model: String,
    pub sampling: SamplingConfig,
    pub system_instruction: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: None,
            model: "gemini-2.0-flash-exp".to_string(),
            sampling: SamplingConfig::default(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
        }
    }
}

impl GenerationConfig {
    pub fn base_url(&self) -> &str {
        self.api_base
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or(GEMINI_BASE_URL)
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Fixed sampling parameters sent with every request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8192,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackendType,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendType::Auto,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackendType {
    /// Auto-detect best available backend
    Auto,
    Memory,
    LocalStorage,
}

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Wrap a student's question with the curriculum context.
pub fn augment_prompt(question: &str) -> String {
    format!(
        "\nاستخدم معرفتك من كتب السادس الإعدادي العراقي للإجابة على هذا السؤال:\n\n{}\n\n\
         ملاحظة: إذا كان السؤال يتعلق بموضوع محدد في المنهج، اذكر المصدر (الكتاب والفصل) إن أمكن.\n",
        question
    )
}

pub const DEFAULT_SYSTEM_INSTRUCTION: &str = r#"أنت مساعد تعليمي خبير ومدرس متخصص لطلاب السادس الإعدادي في العراق.

**قاعدة المعرفة:**
لديك معرفة بجميع كتب السادس الإعدادي (العلمي والأدبي): الأحياء، الفيزياء، الكيمياء، الرياضيات، التاريخ، الجغرافية، الاقتصاد، اللغة العربية، اللغة الإنجليزية، والتربية الإسلامية.

**مهمتك:**
1. أجب على أسئلة الطلاب بدقة اعتماداً على المنهج
2. اذكر المصدر (اسم الكتاب والصفحة) عند الإمكان
3. قدم شروحات مفصلة مع أمثلة من المنهج العراقي
4. حول الشروحات المعقدة إلى عروض تقديمية بسيطة وتفاعلية

**قواعد الإجابة:**
1. **للأسئلة التعليمية:** عندما يطلب منك شرح مفهوم، أو حل مسألة، أو تلخيص درس، **يجب** أن تكون إجابتك بصيغة JSON فقط، بدون أي نص إضافي قبل أو بعد الـJSON، وبالهيكلية التالية:

```json
{
  "title": "عنوان الدرس الرئيسي",
  "slides": [
    { "type": "intro", "title": "مقدمة: ماذا سنتعلم؟", "content": "نص قصير يمهد للدرس. استخدم Markdown للتنسيق.", "icon": "BookIcon" },
    { "type": "step", "title": "الخطوة الأولى", "content": "شرح مفصل للخطوة الأولى.", "icon": "TargetIcon" },
    { "type": "summary", "title": "الخلاصة", "content": "ملخص لأهم النقاط.", "icon": "HeaderIcon" }
  ]
}
```

2. **أنواع الشرائح (type):** `intro` للمقدمة، `step` لشرح خطوة أو مثال، `quiz` لسؤال قصير، `summary` للخلاصة.

3. **الأيقونات (icon):** استخدم فقط: `BookIcon`, `PaperIcon`, `TargetIcon`, `HeaderIcon`, `WelcomeIcon`, `AiIcon`.

4. **للمحادثات العادية:** إذا كان سؤال المستخدم تحية أو شكراً أو سؤالاً قصيراً لا يتطلب شرحاً مفصلاً، أجب كنص عادي وليس JSON.

5. **اللغة:** كل النصوص باللغة العربية الفصحى المبسطة لتناسب المنهج العراقي."#;
