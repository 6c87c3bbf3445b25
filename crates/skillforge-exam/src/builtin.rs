use skillforge_types::ExamId;

use crate::bank::QuestionBank;

/// The platform's three built-in question banks.
///
/// Banks are fixed: question order, option order, and correct indices are
/// the grading contract and must never change for a published course.
pub fn builtin_banks() -> Vec<QuestionBank> {
    vec![
        introduction_to_python(),
        machine_learning(),
        blockchain_and_web3(),
    ]
}

fn introduction_to_python() -> QuestionBank {
    let mut bank = QuestionBank::new(
        ExamId::new("introduction-to-python"),
        "Introduction to Python",
    );
    bank.push(
        "What is the correct way to comment a line in Python?",
        &[
            "// this is a comment",
            "/* this is a comment */",
            "# this is a comment",
        ],
        2,
    );
    bank.push(
        "What data type is the result of: 5 + 3.14?",
        &["int", "float", "str"],
        1,
    );
    bank.push(
        "How do you create a function in Python?",
        &[
            "def function_name():",
            "function function_name()",
            "function function_name:{}",
        ],
        0,
    );
    bank.push(
        "Which of the following is not a valid variable name?",
        &["my_var", "my-var", "myVar"],
        1,
    );
    bank.push(
        "How do you create a list in Python?",
        &["list = {}", "list = []", "list = ()"],
        1,
    );
    bank.push(
        "What will the output be: print(10 % 3)?",
        &["3", "1", "0"],
        1,
    );
    bank.push(
        "Which method would you use to add an item to the end of a list?",
        &["push()", "add()", "append()"],
        2,
    );
    bank.push(
        "How do you start a loop that continues until `i` is 5?",
        &["while i < 5:", "while (i < 5)", "while i = 5:"],
        0,
    );
    bank.push(
        "How do you import a library in Python?",
        &[
            "import library_name",
            "using library_name",
            "#include library_name",
        ],
        0,
    );
    bank.push(
        "Which function is used to read user input?",
        &["input()", "read()", "scan()"],
        0,
    );
    bank
}

fn machine_learning() -> QuestionBank {
    let mut bank = QuestionBank::new(ExamId::new("machine-learning"), "Machine Learning");
    bank.push(
        "Which of the following is a supervised learning method?",
        &["K-Means", "Linear Regression", "PCA"],
        1,
    );
    bank.push(
        "What is the commonly used loss function for classification problems?",
        &["Mean Squared Error", "Cross-Entropy", "Both of the above"],
        1,
    );
    bank.push(
        "Which of the following is not a type of machine learning?",
        &[
            "Supervised Learning",
            "Unsupervised Learning",
            "Uncontrolled Learning",
        ],
        2,
    );
    bank.push(
        "What does SVM stand for in machine learning?",
        &[
            "Simple Vector Machine",
            "Support Vector Machine",
            "Sequential Vector Machine",
        ],
        1,
    );
    bank.push(
        "Which algorithm is used to partition an unlabeled dataset?",
        &[
            "K-Means Clustering",
            "Linear Regression",
            "Logistic Regression",
        ],
        0,
    );
    bank.push(
        "In machine learning, what does overfitting refer to?",
        &[
            "Model performs poorly on unseen data",
            "Model performs well on unseen data",
            "Model performs equally on all data",
        ],
        0,
    );
    bank.push(
        "What is the goal of regression in machine learning?",
        &[
            "Classify data into categories",
            "Predict a continuous value",
            "Group data into clusters",
        ],
        1,
    );
    bank.push(
        "Which of the following is a popular neural network framework?",
        &["TensorFlow", "Pandas", "Scikit-learn"],
        0,
    );
    bank.push(
        "What is the process of dividing data into training and testing sets called?",
        &["Data Splitting", "Data Cleaning", "Data Extraction"],
        0,
    );
    bank.push(
        "Which of the following algorithms relies on Bayes theorem?",
        &["Naive Bayes", "Random Forest", "Gradient Boosting"],
        0,
    );
    bank
}

fn blockchain_and_web3() -> QuestionBank {
    let mut bank = QuestionBank::new(ExamId::new("blockchain-web3"), "Blockchain & Web3");
    bank.push(
        "What does the term \"Blockchain\" refer to?",
        &[
            "A type of database",
            "A programming language",
            "A web framework",
        ],
        0,
    );
    bank.push(
        "What is the primary cryptocurrency used on the Ethereum network?",
        &["Bitcoin", "Ether", "Litecoin"],
        1,
    );
    bank.push(
        "What is the standard for creating smart contracts on Ethereum?",
        &["ERC-20", "Solidity", "ERC-721"],
        1,
    );
    bank.push(
        "Which of the following is a decentralized app (dApp)?",
        &["Facebook", "Google Maps", "CryptoKitties"],
        2,
    );
    bank.push(
        "Which consensus algorithm is commonly used in public blockchains?",
        &["Proof of Work", "Proof of Identity", "Proof of Stake"],
        0,
    );
    bank.push(
        "What is a smart contract?",
        &[
            "A legal document",
            "A self-executing contract with code",
            "A type of cryptocurrency",
        ],
        1,
    );
    bank.push(
        "What is the main advantage of decentralized systems?",
        &["Speed", "Censorship resistance", "Ease of use"],
        1,
    );
    bank.push(
        "What does Web3 enable users to do?",
        &[
            "Create websites",
            "Interact with decentralised networks",
            "Speed up internet connection",
        ],
        1,
    );
    bank.push(
        "What is a hard fork in blockchain?",
        &[
            "A security feature",
            "A type of wallet",
            "A major update that is not backward compatible",
        ],
        2,
    );
    bank.push(
        "Which programming language is commonly used to write Ethereum smart contracts?",
        &["Python", "Java", "Solidity"],
        2,
    );
    bank
}
